use std::sync::Arc;

use log::{debug, warn};

use crate::cache::{SnapshotCache, StorageBackend};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::MatchSnapshot;
use crate::mutation::Mutation;
use crate::publisher::{RemoteSink, UpdatePublisher};
use crate::registry::{SubscriberRegistry, Subscription};
use crate::signal::{ChangeNotice, Signal, SignalChannel};

/// One tab's wiring of the whole mechanism: a snapshot cache, a
/// subscriber registry, a signal channel endpoint, and the publisher on
/// top of them.
///
/// Created once at application start and torn down with the tab. Editing
/// surfaces call [`apply`](Self::apply); display surfaces call
/// [`subscribe`](Self::subscribe) on mount and unsubscribe on unmount.
/// Changes observed on the channel from other tabs are relayed into the
/// local registry automatically, and never re-broadcast.
pub struct LiveSync<S: StorageBackend, C: SignalChannel> {
    publisher: UpdatePublisher<S, C>,
}

impl<S, C> LiveSync<S, C>
where
    S: StorageBackend + Clone + 'static,
    C: SignalChannel,
{
    pub fn new(backend: S, channel: C) -> Self {
        Self::with_config(backend, channel, SyncConfig::default())
    }

    pub fn with_config(backend: S, channel: C, config: SyncConfig) -> Self {
        let cache = SnapshotCache::new(backend, config);
        let registry = SubscriberRegistry::new();

        let relay_cache = cache.clone();
        let relay_registry = registry.clone();
        channel.on_external_change(Arc::new(move |signal: &Signal| {
            relay(&relay_cache, &relay_registry, signal);
        }));

        let publisher = UpdatePublisher::new(cache, registry, channel);
        Self { publisher }
    }

    /// Attach a best-effort downstream for committed snapshots.
    pub fn with_sink(mut self, sink: Box<dyn RemoteSink>) -> Self {
        self.publisher.add_sink(sink);
        self
    }

    /// Apply a mutation and publish the resulting snapshot. See
    /// [`UpdatePublisher::apply`].
    pub fn apply(&self, match_id: &str, mutation: Mutation) -> Result<MatchSnapshot, SyncError> {
        self.publisher.apply(match_id, mutation)
    }

    /// Register a callback for every future change to one match.
    pub fn subscribe<F>(&self, match_id: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&MatchSnapshot) + Send + Sync + 'static,
    {
        self.publisher.registry().subscribe(match_id, callback)
    }

    /// Latest cached snapshot for a match, if any.
    pub fn get(&self, match_id: &str) -> Result<Option<MatchSnapshot>, SyncError> {
        self.publisher.cache().get(match_id)
    }

    /// Clear a match's cached state, e.g. when an admin aborts live
    /// scoring. Local only; other tabs keep their view until their next
    /// update.
    pub fn reset(&self, match_id: &str) -> Result<bool, SyncError> {
        self.publisher.cache().remove(match_id)
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        self.publisher.registry()
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        self.publisher.cache()
    }
}

/// Relay one externally observed signal into the local registry.
///
/// Reads the snapshot back from the cache rather than trusting the
/// signal: the cache is authoritative, the signal only says "something
/// changed". Nothing here broadcasts, so a relayed change can never loop
/// back onto the channel.
fn relay<S: StorageBackend>(
    cache: &SnapshotCache<S>,
    registry: &SubscriberRegistry,
    signal: &Signal,
) {
    let Some(key_match_id) = cache.config().match_id_from_key(&signal.key) else {
        // a storage key outside our namespace
        return;
    };
    let notice: ChangeNotice = match signal.decode() {
        Ok(notice) => notice,
        Err(err) => {
            warn!("undecodable change notice on key {}: {}", signal.key, err);
            return;
        }
    };
    if notice.match_id != key_match_id {
        warn!(
            "change notice match id {} does not match key {}; ignoring",
            notice.match_id, signal.key
        );
        return;
    }
    if !registry.wants(&notice.match_id, notice.version) {
        return;
    }
    match cache.get(&notice.match_id) {
        Ok(Some(snapshot)) => registry.publish(&notice.match_id, &snapshot),
        Ok(None) => debug!(
            "change notice for match {} with no readable cache entry",
            notice.match_id
        ),
        Err(err) => warn!("cache read failed for match {}: {}", notice.match_id, err),
    }
}
