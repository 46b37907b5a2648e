mod cache;
mod config;
mod error;
mod model;
mod mutation;
mod publisher;
mod registry;
mod signal;
mod sync;

pub use cache::{InMemoryBackend, SnapshotCache, StorageBackend, StorageError};
pub use config::SyncConfig;
pub use error::SyncError;
pub use model::{
    MapState, MapStatus, MatchSnapshot, MatchStatus, PlayerState, StatField, TeamSide, ROSTER_SIZE,
};
pub use mutation::{MapPlan, MatchSetup, Mutation, PlayerSeed, ValidationError};
pub use publisher::{ForwardError, LogSink, RemoteSink, UpdatePublisher};
pub use registry::{SubscriberRegistry, Subscription};
pub use signal::{ChangeNotice, HubEndpoint, InMemoryHub, Signal, SignalChannel, SignalError, SignalHandler};
pub use sync::LiveSync;
