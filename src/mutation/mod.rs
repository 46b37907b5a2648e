//! The closed set of mutations an editing surface can request.
//!
//! Loosely-shaped mutation payloads stop at this boundary: everything is a
//! variant of [`Mutation`], validated before it touches a snapshot. The
//! apply step is pure: it maps (previous snapshot, mutation) to the next
//! snapshot or a [`ValidationError`], and never performs I/O.

mod apply;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{MatchStatus, StatField, TeamSide};

pub(crate) use apply::apply_mutation;

/// One map slot in a [`MatchSetup`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPlan {
    pub map_name: String,
    pub game_mode: String,
}

/// One roster slot in a [`MatchSetup`]. Stats start zeroed, hero unpicked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeed {
    pub player_id: String,
    pub display_name: String,
}

/// Everything needed to start live scoring for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Series format. Must be odd; the map list must have exactly this
    /// many entries.
    pub best_of: u32,
    pub maps: Vec<MapPlan>,
    pub team_a: Vec<PlayerSeed>,
    pub team_b: Vec<PlayerSeed>,
}

/// A partial change to one match, applied by the publisher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// The distinguished mutation that may target a match id with no
    /// cached snapshot. Creates the snapshot `Live` with map 1 active.
    Initialize(MatchSetup),
    /// Apply a signed delta to one player stat.
    AdjustPlayerStat {
        player_id: String,
        stat: StatField,
        delta: i64,
    },
    /// Set or clear a player's hero pick.
    SetPlayerHero {
        player_id: String,
        hero: Option<String>,
    },
    /// Adjust the in-map score of the active map.
    AdjustMapScore { delta_a: i64, delta_b: i64 },
    /// Complete the active map with a winner; advances the series.
    RecordMapWin { winner: TeamSide },
    /// Explicit status transition.
    SetMatchStatus { status: MatchStatus },
}

impl Mutation {
    pub fn is_initialize(&self) -> bool {
        matches!(self, Mutation::Initialize(_))
    }
}

/// A mutation that would break a data-model rule. The cache is left
/// untouched and the previous snapshot stays current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BadFormat {
        best_of: u32,
    },
    MapCountMismatch {
        expected: usize,
        actual: usize,
    },
    RosterSize {
        side: TeamSide,
        expected: usize,
        actual: usize,
    },
    DuplicatePlayer {
        player_id: String,
    },
    UnknownPlayer {
        player_id: String,
    },
    StatOutOfRange {
        player_id: String,
        stat: StatField,
    },
    MapScoreOutOfRange {
        map_name: String,
    },
    NoActiveMap,
    NoPendingMap,
    SeriesNotDecided {
        score_a: u32,
        score_b: u32,
        wins_needed: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::BadFormat { best_of } => {
                write!(f, "best-of format must be odd and non-zero, got {}", best_of)
            }
            ValidationError::MapCountMismatch { expected, actual } => {
                write!(f, "expected {} maps for the format, got {}", expected, actual)
            }
            ValidationError::RosterSize {
                side,
                expected,
                actual,
            } => write!(
                f,
                "team {} roster must have {} players, got {}",
                side, expected, actual
            ),
            ValidationError::DuplicatePlayer { player_id } => {
                write!(f, "player {} appears more than once", player_id)
            }
            ValidationError::UnknownPlayer { player_id } => {
                write!(f, "no player {} on either roster", player_id)
            }
            ValidationError::StatOutOfRange { player_id, stat } => {
                write!(f, "{} for player {} would leave range", stat, player_id)
            }
            ValidationError::MapScoreOutOfRange { map_name } => {
                write!(f, "score on map {} would leave range", map_name)
            }
            ValidationError::NoActiveMap => write!(f, "no map is active"),
            ValidationError::NoPendingMap => write!(f, "no pending map left to activate"),
            ValidationError::SeriesNotDecided {
                score_a,
                score_b,
                wins_needed,
            } => write!(
                f,
                "series stands {}-{}, neither side has the {} wins needed",
                score_a, score_b, wins_needed
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
