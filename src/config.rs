/// Configuration shared by the cache, the publisher, and the signal relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Prefix for cache storage keys; one entry per match id at
    /// `"{key_prefix}{match_id}"`.
    pub key_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            key_prefix: "match_update_".to_string(),
        }
    }
}

impl SyncConfig {
    /// Storage key for a match id.
    pub fn storage_key(&self, match_id: &str) -> String {
        format!("{}{}", self.key_prefix, match_id)
    }

    /// Inverse of [`storage_key`](Self::storage_key). `None` if the key does
    /// not carry this configuration's prefix.
    pub fn match_id_from_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.key_prefix.as_str())
    }
}
