use std::sync::atomic::{AtomicBool, Ordering};

use super::registry::SubscriberRegistry;

/// Handle to one registered callback.
///
/// Deregistration is explicit: call [`unsubscribe`](Self::unsubscribe)
/// when the owning component unmounts. A second call is a no-op. Dropping
/// the handle without unsubscribing leaves the callback registered.
pub struct Subscription {
    registry: SubscriberRegistry,
    match_id: String,
    id: u64,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(registry: SubscriberRegistry, match_id: String, id: u64) -> Self {
        Self {
            registry,
            match_id,
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Deregister the callback. Immediate and synchronous; once this
    /// returns, the callback will not be invoked again.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.registry.remove(&self.match_id, self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }
}
