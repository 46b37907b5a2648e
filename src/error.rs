use std::fmt;

use crate::cache::StorageError;
use crate::mutation::ValidationError;

/// Top-level error for publish and cache operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A mutation referenced a match id with no cached snapshot.
    NotFound { match_id: String },
    /// The mutation would violate a data-model rule. The cache is untouched.
    Validation(ValidationError),
    /// The backing store rejected a write. The mutation failed entirely;
    /// no notification was delivered.
    Persistence(String),
    /// A snapshot or signal payload could not be encoded.
    Serialization(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NotFound { match_id } => {
                write!(f, "no snapshot stored for match {}", match_id)
            }
            SyncError::Validation(err) => write!(f, "validation failed: {}", err),
            SyncError::Persistence(msg) => write!(f, "persistence failed: {}", msg),
            SyncError::Serialization(msg) => write!(f, "serialization failed: {}", msg),
            SyncError::LockPoisoned(operation) => {
                write!(f, "lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for SyncError {}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        SyncError::Validation(err)
    }
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned(operation) => SyncError::LockPoisoned(operation),
            other => SyncError::Persistence(other.to_string()),
        }
    }
}
