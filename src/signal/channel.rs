use std::fmt;
use std::sync::Arc;

use super::signal::Signal;

/// Handler invoked with signals that originate at other endpoints.
pub type SignalHandler = Arc<dyn Fn(&Signal) + Send + Sync>;

/// Error type for broadcast operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The transport is gone (hub dropped, tab unloading).
    Closed(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::Closed(msg) => write!(f, "signal channel closed: {}", msg),
            SignalError::LockPoisoned(operation) => {
                write!(f, "signal channel lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for SignalError {}

/// Cross-process notification capability.
///
/// One endpoint per process (browser tab). `broadcast` makes a signal
/// visible to every *other* endpoint; the handler registered with
/// [`on_external_change`](Self::on_external_change) fires for exactly
/// those signals, never for the endpoint's own broadcasts.
pub trait SignalChannel: Send + Sync {
    /// Deliver a signal to every other endpoint sharing this channel.
    fn broadcast(&self, signal: Signal) -> Result<(), SignalError>;

    /// Register the handler for externally originated signals. A second
    /// registration replaces the first.
    fn on_external_change(&self, handler: SignalHandler);
}
