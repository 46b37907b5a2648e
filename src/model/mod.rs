//! Match state value types.
//!
//! A [`MatchSnapshot`] is the complete live state of one match at one
//! version: series scores, per-map scores, and per-player stats for the
//! active map. Snapshots are immutable from the consumer's point of view:
//! every change goes through the publisher, which produces a new snapshot
//! with a strictly greater version.
//!
//! Derived values (`kda`, series scores) are never stored independently of
//! the fields they derive from: `kda` is recomputed on read, series scores
//! are recomputed from map winners on every mutation.

mod map;
mod player;
mod snapshot;

pub use map::{MapState, MapStatus, TeamSide};
pub use player::{PlayerState, StatField};
pub use snapshot::{MatchSnapshot, MatchStatus, ROSTER_SIZE};
