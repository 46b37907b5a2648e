use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::channel::{SignalChannel, SignalError, SignalHandler};
use super::signal::Signal;

struct EndpointSlot {
    id: u64,
    handler: Arc<RwLock<Option<SignalHandler>>>,
}

struct HubInner {
    endpoints: RwLock<Vec<EndpointSlot>>,
    log: RwLock<Vec<Signal>>,
    next_id: AtomicU64,
}

/// In-memory signal hub linking any number of endpoints ("tabs") in one
/// process.
///
/// A broadcast from one endpoint is delivered synchronously to the handler
/// of every other endpoint, and never back to the sender - the delivery
/// rule of browser storage events. All signals are also kept in an
/// append-only log for test introspection.
#[derive(Clone)]
pub struct InMemoryHub {
    inner: Arc<HubInner>,
}

impl Default for InMemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                endpoints: RwLock::new(Vec::new()),
                log: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Attach a new endpoint. Each simulated tab gets its own.
    pub fn endpoint(&self) -> HubEndpoint {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let handler = Arc::new(RwLock::new(None));
        if let Ok(mut endpoints) = self.inner.endpoints.write() {
            endpoints.push(EndpointSlot {
                id,
                handler: Arc::clone(&handler),
            });
        }
        HubEndpoint {
            inner: Arc::clone(&self.inner),
            id,
            handler,
        }
    }

    /// All signals broadcast through this hub, in order.
    pub fn signals(&self) -> Vec<Signal> {
        self.inner.log.read().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.log.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One endpoint of an [`InMemoryHub`]. Detaches itself on drop.
pub struct HubEndpoint {
    inner: Arc<HubInner>,
    id: u64,
    handler: Arc<RwLock<Option<SignalHandler>>>,
}

impl SignalChannel for HubEndpoint {
    fn broadcast(&self, signal: Signal) -> Result<(), SignalError> {
        self.inner
            .log
            .write()
            .map_err(|_| SignalError::LockPoisoned("log write"))?
            .push(signal.clone());

        // collect handlers first so none is invoked under the hub lock
        let targets: Vec<SignalHandler> = {
            let endpoints = self
                .inner
                .endpoints
                .read()
                .map_err(|_| SignalError::LockPoisoned("endpoints read"))?;
            endpoints
                .iter()
                .filter(|slot| slot.id != self.id)
                .filter_map(|slot| slot.handler.read().ok().and_then(|h| h.clone()))
                .collect()
        };
        for handler in targets {
            handler(&signal);
        }
        Ok(())
    }

    fn on_external_change(&self, handler: SignalHandler) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(handler);
        }
    }
}

impl Drop for HubEndpoint {
    fn drop(&mut self) {
        if let Ok(mut endpoints) = self.inner.endpoints.write() {
            endpoints.retain(|slot| slot.id != self.id);
        }
    }
}
