use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, error};

use crate::model::MatchSnapshot;

use super::subscription::Subscription;

type Callback = Arc<dyn Fn(&MatchSnapshot) + Send + Sync>;

struct SubscriberEntry {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct MatchEntry {
    /// Registration order; delivery walks this front to back.
    subscribers: Vec<SubscriberEntry>,
    /// Version of the last snapshot delivered for this id. Anything at or
    /// below it is suppressed.
    last_delivered: Option<u64>,
}

struct RegistryInner {
    matches: RwLock<HashMap<String, MatchEntry>>,
    next_id: AtomicU64,
}

/// Process-wide registry of match subscribers.
///
/// Clone-friendly (cloning shares the same underlying table). Entries
/// exist only while at least one subscriber is registered for the id:
/// when the last one unsubscribes, the per-id bookkeeping goes with it,
/// so the registry cannot grow without bound over a tab's lifetime.
#[derive(Clone)]
pub struct SubscriberRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                matches: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register `callback` for every future change to `match_id`'s
    /// snapshot. The returned handle deregisters it; unsubscribing twice
    /// is a no-op.
    pub fn subscribe<F>(&self, match_id: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&MatchSnapshot) + Send + Sync + 'static,
    {
        let match_id = match_id.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut matches) = self.inner.matches.write() {
            matches
                .entry(match_id.clone())
                .or_default()
                .subscribers
                .push(SubscriberEntry {
                    id,
                    callback: Arc::new(callback),
                });
        }
        Subscription::new(self.clone(), match_id, id)
    }

    /// Deliver `snapshot` to every subscriber of `match_id`, in
    /// registration order.
    ///
    /// Called by the publisher right after a successful cache write, and
    /// by the signal relay for changes observed from other tabs. Stale or
    /// duplicate versions are suppressed. A panicking callback is caught
    /// and logged; the remaining callbacks still run.
    pub fn publish(&self, match_id: &str, snapshot: &MatchSnapshot) {
        let callbacks: Vec<Callback> = {
            let mut matches = match self.inner.matches.write() {
                Ok(guard) => guard,
                Err(_) => {
                    error!("subscriber table poisoned; dropping notification");
                    return;
                }
            };
            let Some(entry) = matches.get_mut(match_id) else {
                return;
            };
            if let Some(last) = entry.last_delivered {
                if snapshot.version <= last {
                    debug!(
                        "suppressing notification for match {} (version {} already delivered {})",
                        match_id, snapshot.version, last
                    );
                    return;
                }
            }
            entry.last_delivered = Some(snapshot.version);
            entry
                .subscribers
                .iter()
                .map(|s| Arc::clone(&s.callback))
                .collect()
        };
        // invoked outside the lock so a callback may subscribe or
        // unsubscribe without deadlocking
        for callback in callbacks {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(snapshot))) {
                error!(
                    "subscriber callback for match {} panicked: {}",
                    match_id,
                    panic_message(panic.as_ref())
                );
            }
        }
    }

    /// Whether an incoming notice for `(match_id, version)` would reach
    /// any subscriber. Lets the relay skip the cache read for ids nobody
    /// watches and versions already delivered.
    pub fn wants(&self, match_id: &str, version: u64) -> bool {
        let Ok(matches) = self.inner.matches.read() else {
            return false;
        };
        match matches.get(match_id) {
            Some(entry) if !entry.subscribers.is_empty() => {
                entry.last_delivered.map_or(true, |last| version > last)
            }
            _ => false,
        }
    }

    pub fn subscriber_count(&self, match_id: &str) -> usize {
        self.inner
            .matches
            .read()
            .ok()
            .and_then(|m| m.get(match_id).map(|e| e.subscribers.len()))
            .unwrap_or(0)
    }

    /// True when no match id has any subscriber (and therefore no
    /// bookkeeping is held at all).
    pub fn is_empty(&self) -> bool {
        self.inner.matches.read().map(|m| m.is_empty()).unwrap_or(true)
    }

    /// Version of the last snapshot delivered for `match_id`, if any
    /// subscriber is still registered for it.
    pub fn last_delivered_version(&self, match_id: &str) -> Option<u64> {
        self.inner
            .matches
            .read()
            .ok()
            .and_then(|m| m.get(match_id).and_then(|e| e.last_delivered))
    }

    pub(crate) fn remove(&self, match_id: &str, id: u64) {
        let Ok(mut matches) = self.inner.matches.write() else {
            return;
        };
        if let Some(entry) = matches.get_mut(match_id) {
            entry.subscribers.retain(|s| s.id != id);
            if entry.subscribers.is_empty() {
                matches.remove(match_id);
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
