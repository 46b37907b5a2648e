//! Durable local cache - the last-known snapshot per match id.
//!
//! The backing store is a plain string key-value surface behind the
//! [`StorageBackend`] trait, so the same cache logic runs against browser
//! local storage, a file, or the in-memory backend shipped here. Snapshots
//! cross the boundary as self-describing JSON; a stored value that no
//! longer deserializes reads back as "no data" with a logged warning,
//! never as a blocking failure.

mod backend;
mod in_memory;
mod snapshot_cache;

pub use backend::{StorageBackend, StorageError};
pub use in_memory::InMemoryBackend;
pub use snapshot_cache::SnapshotCache;
