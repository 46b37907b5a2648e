use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::backend::{StorageBackend, StorageError};

/// In-memory string store backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage), which is
/// how tests give several simulated tabs one shared "browser profile".
/// An optional byte quota makes exhausted-storage behavior reproducible.
#[derive(Clone)]
pub struct InMemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: None,
        }
    }

    /// A backend that rejects writes once total stored bytes would pass
    /// `bytes`. A quota of 0 refuses every write.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned("write"))?;
        if let Some(limit) = self.quota {
            let stored: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let attempted = stored + key.len() + value.len();
            if attempted > limit {
                return Err(StorageError::QuotaExceeded { limit, attempted });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned("write"))?;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read() {
        let backend = InMemoryBackend::new();
        backend.write("k1", "v1").unwrap();
        assert_eq!(backend.read("k1").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn read_missing_returns_none() {
        let backend = InMemoryBackend::new();
        assert!(backend.read("missing").unwrap().is_none());
    }

    #[test]
    fn write_overwrites() {
        let backend = InMemoryBackend::new();
        backend.write("k1", "v1").unwrap();
        backend.write("k1", "v2").unwrap();
        assert_eq!(backend.read("k1").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn remove_existing() {
        let backend = InMemoryBackend::new();
        backend.write("k1", "v1").unwrap();
        assert!(backend.remove("k1").unwrap());
        assert!(!backend.remove("k1").unwrap());
        assert!(backend.read("k1").unwrap().is_none());
    }

    #[test]
    fn clones_share_storage() {
        let backend = InMemoryBackend::new();
        let other = backend.clone();
        backend.write("k1", "v1").unwrap();
        assert_eq!(other.read("k1").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let backend = InMemoryBackend::with_quota(8);
        backend.write("k", "1234").unwrap();
        let err = backend.write("k2", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 8, .. }));
        // prior entry is untouched
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn quota_counts_replacement_not_double() {
        let backend = InMemoryBackend::with_quota(10);
        backend.write("key", "12345").unwrap();
        // replacing the same key re-uses its budget
        backend.write("key", "1234567").unwrap();
        assert_eq!(backend.read("key").unwrap().as_deref(), Some("1234567"));
    }
}
