//! Cross-tab change signals.
//!
//! The browser mechanism by which one tab's storage write becomes visible
//! to other tabs is abstracted as a [`SignalChannel`]: `broadcast` pushes a
//! [`Signal`] out, and a registered handler receives signals that originate
//! at *other* endpoints. An endpoint never sees its own broadcasts, which
//! is what rules out signal loops by construction - relaying a received
//! signal into the local registry cannot produce a new broadcast.
//!
//! [`InMemoryHub`] links any number of endpoints in one process so the
//! whole mechanism runs in tests without a real multi-tab environment.

mod channel;
mod in_memory;
mod signal;

pub use channel::{SignalChannel, SignalError, SignalHandler};
pub use in_memory::{HubEndpoint, InMemoryHub};
pub use signal::{ChangeNotice, Signal};
