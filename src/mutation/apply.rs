use std::collections::HashSet;
use std::time::SystemTime;

use crate::error::SyncError;
use crate::model::{
    MapState, MapStatus, MatchSnapshot, MatchStatus, PlayerState, TeamSide, ROSTER_SIZE,
};

use super::{MatchSetup, Mutation, ValidationError};

/// Turn the cached snapshot (if any) and a mutation into the next snapshot.
///
/// Pure except for reading the clock. On success the result carries
/// `version = previous + 1` (1 for a first initialize) and a fresh
/// `updated_at`; all derived fields are recomputed. On error the caller's
/// snapshot is unaffected.
pub(crate) fn apply_mutation(
    current: Option<MatchSnapshot>,
    match_id: &str,
    mutation: Mutation,
) -> Result<MatchSnapshot, SyncError> {
    let mut next = match mutation {
        Mutation::Initialize(setup) => {
            let prev_version = current.as_ref().map_or(0, |s| s.version);
            initialize(match_id, setup, prev_version)?
        }
        other => {
            let current = current.ok_or_else(|| SyncError::NotFound {
                match_id: match_id.to_string(),
            })?;
            modify(current, other)?
        }
    };

    next.refresh_series_scores();
    next.version += 1;
    next.updated_at = SystemTime::now();

    debug_assert!(invariants_hold(&next));
    Ok(next)
}

fn initialize(
    match_id: &str,
    setup: MatchSetup,
    prev_version: u64,
) -> Result<MatchSnapshot, ValidationError> {
    if setup.best_of == 0 || setup.best_of % 2 == 0 {
        return Err(ValidationError::BadFormat {
            best_of: setup.best_of,
        });
    }
    if setup.maps.len() != setup.best_of as usize {
        return Err(ValidationError::MapCountMismatch {
            expected: setup.best_of as usize,
            actual: setup.maps.len(),
        });
    }
    for (side, roster) in [(TeamSide::A, &setup.team_a), (TeamSide::B, &setup.team_b)] {
        if roster.len() != ROSTER_SIZE {
            return Err(ValidationError::RosterSize {
                side,
                expected: ROSTER_SIZE,
                actual: roster.len(),
            });
        }
    }
    let mut seen = HashSet::new();
    for seed in setup.team_a.iter().chain(setup.team_b.iter()) {
        if !seen.insert(seed.player_id.as_str()) {
            return Err(ValidationError::DuplicatePlayer {
                player_id: seed.player_id.clone(),
            });
        }
    }

    let mut maps: Vec<MapState> = setup
        .maps
        .into_iter()
        .map(|plan| MapState::new(plan.map_name, plan.game_mode))
        .collect();
    maps[0].status = MapStatus::Active;

    let roster = |seeds: Vec<super::PlayerSeed>| {
        seeds
            .into_iter()
            .map(|seed| PlayerState::new(seed.player_id, seed.display_name))
            .collect()
    };

    Ok(MatchSnapshot {
        match_id: match_id.to_string(),
        best_of: setup.best_of,
        series_score_a: 0,
        series_score_b: 0,
        current_map_index: 1,
        maps,
        team_a: roster(setup.team_a),
        team_b: roster(setup.team_b),
        status: MatchStatus::Live,
        version: prev_version,
        updated_at: SystemTime::UNIX_EPOCH,
    })
}

fn modify(mut snap: MatchSnapshot, mutation: Mutation) -> Result<MatchSnapshot, ValidationError> {
    match mutation {
        Mutation::Initialize(_) => unreachable!("handled by apply_mutation"),
        Mutation::AdjustPlayerStat {
            player_id,
            stat,
            delta,
        } => {
            let player = snap
                .player_mut(&player_id)
                .ok_or_else(|| ValidationError::UnknownPlayer {
                    player_id: player_id.clone(),
                })?;
            player
                .adjust_stat(stat, delta)
                .ok_or(ValidationError::StatOutOfRange { player_id, stat })?;
        }
        Mutation::SetPlayerHero { player_id, hero } => {
            let player = snap
                .player_mut(&player_id)
                .ok_or_else(|| ValidationError::UnknownPlayer {
                    player_id: player_id.clone(),
                })?;
            player.hero = hero;
        }
        Mutation::AdjustMapScore { delta_a, delta_b } => {
            let pos = snap
                .active_map_position()
                .ok_or(ValidationError::NoActiveMap)?;
            let map = &mut snap.maps[pos];
            // compute both before writing either, so a rejected delta
            // leaves the map untouched
            let next_a = map.score_a.checked_add_signed(delta_a);
            let next_b = map.score_b.checked_add_signed(delta_b);
            match (next_a, next_b) {
                (Some(a), Some(b)) => {
                    map.score_a = a;
                    map.score_b = b;
                }
                _ => {
                    return Err(ValidationError::MapScoreOutOfRange {
                        map_name: map.map_name.clone(),
                    })
                }
            }
        }
        Mutation::RecordMapWin { winner } => {
            let pos = snap
                .active_map_position()
                .ok_or(ValidationError::NoActiveMap)?;
            let map = &mut snap.maps[pos];
            map.status = MapStatus::Completed;
            map.winner = Some(winner);
            snap.refresh_series_scores();

            let next_pending = snap.maps.iter().position(|m| m.status == MapStatus::Pending);
            match next_pending {
                Some(next) if !snap.is_decided() => {
                    snap.maps[next].status = MapStatus::Active;
                    snap.current_map_index = next + 1;
                }
                _ => {
                    // series over: either the win threshold is met or the
                    // map pool is exhausted (same thing for odd formats)
                    snap.status = MatchStatus::Completed;
                    snap.current_map_index = pos + 1;
                }
            }
        }
        Mutation::SetMatchStatus { status } => set_status(&mut snap, status)?,
    }
    Ok(snap)
}

fn set_status(snap: &mut MatchSnapshot, status: MatchStatus) -> Result<(), ValidationError> {
    match status {
        MatchStatus::Completed => {
            if !snap.is_decided() {
                return Err(ValidationError::SeriesNotDecided {
                    score_a: snap.series_score_a,
                    score_b: snap.series_score_b,
                    wins_needed: snap.wins_needed(),
                });
            }
            deactivate(snap);
        }
        MatchStatus::Scheduled => deactivate(snap),
        MatchStatus::Live => {
            if snap.active_map_position().is_none() {
                let next = snap
                    .maps
                    .iter()
                    .position(|m| m.status == MapStatus::Pending)
                    .ok_or(ValidationError::NoPendingMap)?;
                snap.maps[next].status = MapStatus::Active;
                snap.current_map_index = next + 1;
            }
        }
    }
    snap.status = status;
    Ok(())
}

fn deactivate(snap: &mut MatchSnapshot) {
    if let Some(map) = snap.active_map_mut() {
        map.status = MapStatus::Pending;
    }
}

fn invariants_hold(snap: &MatchSnapshot) -> bool {
    let active = snap
        .maps
        .iter()
        .filter(|m| m.status == MapStatus::Active)
        .count();
    let active_ok = match snap.status {
        MatchStatus::Live => active == 1,
        _ => active == 0,
    };
    let rosters_ok = snap.team_a.len() == ROSTER_SIZE && snap.team_b.len() == ROSTER_SIZE;
    let winners_ok = snap
        .maps
        .iter()
        .all(|m| (m.status == MapStatus::Completed) == m.winner.is_some());
    let series_ok =
        (snap.series_score_a + snap.series_score_b) as usize <= snap.maps_completed();
    active_ok && rosters_ok && winners_ok && series_ok
}
