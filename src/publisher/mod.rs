//! Update publisher - the single write path for match snapshots.
//!
//! Every change goes through [`UpdatePublisher::apply`]: load the current
//! snapshot, apply the mutation, persist the candidate, then announce it,
//! in that order. The cache write is the commit point - a failed write
//! means the mutation failed entirely and nothing is announced, so
//! subscribers can never observe a snapshot the cache does not hold.

mod remote;

use log::warn;

use crate::cache::{SnapshotCache, StorageBackend};
use crate::error::SyncError;
use crate::model::MatchSnapshot;
use crate::mutation::{apply_mutation, Mutation};
use crate::registry::SubscriberRegistry;
use crate::signal::{ChangeNotice, Signal, SignalChannel};

pub use remote::{ForwardError, LogSink, RemoteSink};

pub struct UpdatePublisher<S: StorageBackend, C: SignalChannel> {
    cache: SnapshotCache<S>,
    registry: SubscriberRegistry,
    channel: C,
    sinks: Vec<Box<dyn RemoteSink>>,
}

impl<S: StorageBackend, C: SignalChannel> UpdatePublisher<S, C> {
    pub fn new(cache: SnapshotCache<S>, registry: SubscriberRegistry, channel: C) -> Self {
        Self {
            cache,
            registry,
            channel,
            sinks: Vec::new(),
        }
    }

    /// Attach a best-effort downstream for successfully committed
    /// snapshots.
    pub fn add_sink(&mut self, sink: Box<dyn RemoteSink>) {
        self.sinks.push(sink);
    }

    /// Apply `mutation` to the cached snapshot for `match_id` and publish
    /// the result.
    ///
    /// On success the returned snapshot is the cache's new current value,
    /// every local subscriber has been notified, and other tabs have been
    /// signalled. On any error the cache still holds the previous
    /// snapshot and no notification was delivered.
    pub fn apply(&self, match_id: &str, mutation: Mutation) -> Result<MatchSnapshot, SyncError> {
        let current = self.cache.get(match_id)?;
        let next = apply_mutation(current, match_id, mutation)?;

        self.cache.put(&next)?;
        self.registry.publish(match_id, &next);
        self.announce(match_id, &next);
        self.forward(&next);
        Ok(next)
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Cross-tab signal for a committed snapshot. The local commit already
    /// happened, so a failure here only degrades other tabs to their next
    /// cache read; it is logged, not propagated.
    fn announce(&self, match_id: &str, snapshot: &MatchSnapshot) {
        let notice = ChangeNotice {
            match_id: match_id.to_string(),
            version: snapshot.version,
        };
        match Signal::encode(self.cache.storage_key(match_id), &notice) {
            Ok(signal) => {
                if let Err(err) = self.channel.broadcast(signal) {
                    warn!("cross-tab broadcast failed for match {}: {}", match_id, err);
                }
            }
            Err(err) => warn!(
                "could not encode change notice for match {}: {}",
                match_id, err
            ),
        }
    }

    fn forward(&self, snapshot: &MatchSnapshot) {
        for sink in &self.sinks {
            if let Err(err) = sink.forward(snapshot) {
                warn!(
                    "remote forward failed for match {} v{}: {}",
                    snapshot.match_id, snapshot.version, err
                );
            }
        }
    }
}
