use std::fmt;

/// Error from the string key-value store backing the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store refused the write for lack of space.
    QuotaExceeded { limit: usize, attempted: usize },
    /// The store is disabled or otherwise unreachable.
    Unavailable(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QuotaExceeded { limit, attempted } => write!(
                f,
                "storage quota exceeded ({} bytes requested, {} byte limit)",
                attempted, limit
            ),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// String key-value surface the cache persists through.
///
/// Values are opaque strings; the cache layers serialization on top.
/// Implementations are shared across threads via `Clone` + interior
/// `Arc`s, the same shape as the in-memory stores elsewhere in the crate.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored at `key`. `None` if nothing was ever stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key`, overwriting unconditionally.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value at `key`. Returns true if one existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
