use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a match. Roster slots and map winners are always expressed
/// against this, never against mutable team names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::A => f.write_str("A"),
            TeamSide::B => f.write_str("B"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapStatus {
    Pending,
    Active,
    Completed,
}

/// One map within the series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapState {
    pub map_name: String,
    pub game_mode: String,
    pub score_a: u64,
    pub score_b: u64,
    pub status: MapStatus,
    /// Set exactly when `status` is `Completed`.
    pub winner: Option<TeamSide>,
}

impl MapState {
    pub fn new(map_name: impl Into<String>, game_mode: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            game_mode: game_mode.into(),
            score_a: 0,
            score_b: 0,
            status: MapStatus::Pending,
            winner: None,
        }
    }
}
