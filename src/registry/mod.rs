//! Subscriber registry - per-tab table of match id → callbacks.
//!
//! UI components register interest in one match id and get invoked
//! synchronously, in registration order, every time that match's snapshot
//! changes - whether the change was published in this tab or relayed from
//! another one. Notifications are deduplicated per version: a callback
//! never fires twice for the same version of the same match, and never
//! for a version older than one it has already seen.
//!
//! The registry is an explicit object with a defined lifecycle, injected
//! where it is needed; each test constructs its own instance.

mod registry;
mod subscription;

pub use registry::SubscriberRegistry;
pub use subscription::Subscription;
