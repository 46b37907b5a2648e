use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::{MapState, MapStatus, PlayerState, TeamSide};

/// Fixed roster slots per side.
pub const ROSTER_SIZE: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

/// The complete live state of one match at a point in time.
///
/// Serializes to self-describing JSON that embeds `version`, so a reader
/// can detect staleness without a separate lookup. The serialized form
/// round-trips: deserializing it yields a snapshot equal to the original.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: String,
    /// Series format; odd, so a winner always exists once all maps finish.
    pub best_of: u32,
    pub series_score_a: u32,
    pub series_score_b: u32,
    /// 1-based position of the map currently being played, or of the last
    /// map played once the series is over.
    pub current_map_index: usize,
    pub maps: Vec<MapState>,
    /// Ordered roster, slot = index. Always [`ROSTER_SIZE`] entries.
    pub team_a: Vec<PlayerState>,
    pub team_b: Vec<PlayerState>,
    pub status: MatchStatus,
    /// Strictly increases with every published update to this match id.
    pub version: u64,
    pub updated_at: SystemTime,
}

impl MatchSnapshot {
    /// Map wins one side needs to take the series.
    pub fn wins_needed(&self) -> u32 {
        self.best_of / 2 + 1
    }

    /// Whether one side has already reached [`wins_needed`](Self::wins_needed).
    pub fn is_decided(&self) -> bool {
        let needed = self.wins_needed();
        self.series_score_a >= needed || self.series_score_b >= needed
    }

    pub fn series_score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::A => self.series_score_a,
            TeamSide::B => self.series_score_b,
        }
    }

    /// 0-based position of the map with `Active` status, if any.
    pub fn active_map_position(&self) -> Option<usize> {
        self.maps.iter().position(|m| m.status == MapStatus::Active)
    }

    pub fn active_map(&self) -> Option<&MapState> {
        self.active_map_position().map(|i| &self.maps[i])
    }

    pub fn active_map_mut(&mut self) -> Option<&mut MapState> {
        self.active_map_position().map(move |i| &mut self.maps[i])
    }

    pub fn maps_completed(&self) -> usize {
        self.maps
            .iter()
            .filter(|m| m.status == MapStatus::Completed)
            .count()
    }

    /// Find a player by id, searching both rosters.
    pub fn player(&self, player_id: &str) -> Option<&PlayerState> {
        self.team_a
            .iter()
            .chain(self.team_b.iter())
            .find(|p| p.player_id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut PlayerState> {
        self.team_a
            .iter_mut()
            .chain(self.team_b.iter_mut())
            .find(|p| p.player_id == player_id)
    }

    /// Re-derive both series scores from completed map winners. The stored
    /// scores are never adjusted any other way.
    pub fn refresh_series_scores(&mut self) {
        let mut a = 0;
        let mut b = 0;
        for map in &self.maps {
            match (map.status, map.winner) {
                (MapStatus::Completed, Some(TeamSide::A)) => a += 1,
                (MapStatus::Completed, Some(TeamSide::B)) => b += 1,
                _ => {}
            }
        }
        self.series_score_a = a;
        self.series_score_b = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(prefix: &str) -> Vec<PlayerState> {
        (1..=ROSTER_SIZE)
            .map(|slot| PlayerState::new(format!("{}{}", prefix, slot), format!("Player {}", slot)))
            .collect()
    }

    fn snapshot() -> MatchSnapshot {
        MatchSnapshot {
            match_id: "m1".into(),
            best_of: 3,
            series_score_a: 0,
            series_score_b: 0,
            current_map_index: 1,
            maps: vec![
                MapState::new("Tokyo 2099", "Convergence"),
                MapState::new("Yggsgard", "Domination"),
                MapState::new("Klyntar", "Convoy"),
            ],
            team_a: roster("a"),
            team_b: roster("b"),
            status: MatchStatus::Live,
            version: 1,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn wins_needed_for_common_formats() {
        let mut snap = snapshot();
        assert_eq!(snap.wins_needed(), 2);
        snap.best_of = 5;
        assert_eq!(snap.wins_needed(), 3);
        snap.best_of = 1;
        assert_eq!(snap.wins_needed(), 1);
    }

    #[test]
    fn series_scores_follow_map_winners() {
        let mut snap = snapshot();
        snap.maps[0].status = MapStatus::Completed;
        snap.maps[0].winner = Some(TeamSide::B);
        snap.maps[1].status = MapStatus::Completed;
        snap.maps[1].winner = Some(TeamSide::B);
        snap.refresh_series_scores();

        assert_eq!(snap.series_score_a, 0);
        assert_eq!(snap.series_score_b, 2);
        assert!(snap.is_decided());
        assert!(snap.series_score_a + snap.series_score_b <= snap.maps_completed() as u32);
    }

    #[test]
    fn player_lookup_spans_both_rosters() {
        let mut snap = snapshot();
        assert!(snap.player("a3").is_some());
        assert!(snap.player_mut("b6").is_some());
        assert!(snap.player("c1").is_none());
    }

    #[test]
    fn json_round_trip_preserves_equality() {
        let mut snap = snapshot();
        snap.team_a[0].hero = Some("Iron Man".into());
        snap.team_a[0].kills = 7;
        snap.maps[0].status = MapStatus::Completed;
        snap.maps[0].winner = Some(TeamSide::A);
        snap.refresh_series_scores();
        snap.updated_at = SystemTime::now();

        let text = serde_json::to_string(&snap).unwrap();
        let restored: MatchSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, snap);
    }

    #[test]
    fn serialized_form_embeds_version() {
        let snap = snapshot();
        let text = serde_json::to_string(&snap).unwrap();
        assert!(text.contains("\"version\":1"));
    }
}
