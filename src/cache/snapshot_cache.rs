use log::warn;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::MatchSnapshot;

use super::backend::StorageBackend;

/// Typed cache of the last-known snapshot per match id, layered over a
/// string [`StorageBackend`].
///
/// `put` overwrites unconditionally; version monotonicity is the
/// publisher's responsibility. `get` treats a value that fails to
/// deserialize (corrupt or foreign-format data) as absent - a missing
/// match is a recoverable, displayable state, so the error is logged
/// rather than surfaced.
#[derive(Clone)]
pub struct SnapshotCache<S: StorageBackend> {
    backend: S,
    config: SyncConfig,
}

impl<S: StorageBackend> SnapshotCache<S> {
    pub fn new(backend: S, config: SyncConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn storage_key(&self, match_id: &str) -> String {
        self.config.storage_key(match_id)
    }

    /// The latest stored snapshot, or `None` if nothing (readable) is
    /// stored for this id.
    pub fn get(&self, match_id: &str) -> Result<Option<MatchSnapshot>, SyncError> {
        let key = self.storage_key(match_id);
        let Some(text) = self.backend.read(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                warn!(
                    "discarding unreadable cache entry for match {}: {}",
                    match_id, err
                );
                Ok(None)
            }
        }
    }

    /// Store `snapshot` as the current value for its match id.
    pub fn put(&self, snapshot: &MatchSnapshot) -> Result<(), SyncError> {
        let text = serde_json::to_string(snapshot)
            .map_err(|err| SyncError::Serialization(err.to_string()))?;
        let key = self.storage_key(&snapshot.match_id);
        self.backend.write(&key, &text)?;
        Ok(())
    }

    /// Clear the stored snapshot for a match id, e.g. when an admin resets
    /// or aborts live scoring. Returns true if one existed.
    pub fn remove(&self, match_id: &str) -> Result<bool, SyncError> {
        let key = self.storage_key(match_id);
        Ok(self.backend.remove(&key)?)
    }
}
