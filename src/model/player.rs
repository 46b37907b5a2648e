use serde::{Deserialize, Serialize};
use std::fmt;

/// A single accumulated stat on a [`PlayerState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatField {
    Kills,
    Deaths,
    Assists,
    Damage,
    Healing,
    Blocked,
}

impl StatField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::Kills => "kills",
            StatField::Deaths => "deaths",
            StatField::Assists => "assists",
            StatField::Damage => "damage",
            StatField::Healing => "healing",
            StatField::Blocked => "blocked",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One player's accumulated stats for the currently active map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_id: String,
    pub display_name: String,
    /// Hero pick for the active map. `None` until a pick is made.
    pub hero: Option<String>,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub damage: u64,
    pub healing: u64,
    pub blocked: u64,
}

impl PlayerState {
    /// A fresh roster entry with no pick and zeroed stats.
    pub fn new(player_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            display_name: display_name.into(),
            hero: None,
            kills: 0,
            deaths: 0,
            assists: 0,
            damage: 0,
            healing: 0,
            blocked: 0,
        }
    }

    pub fn stat(&self, field: StatField) -> u64 {
        match field {
            StatField::Kills => self.kills,
            StatField::Deaths => self.deaths,
            StatField::Assists => self.assists,
            StatField::Damage => self.damage,
            StatField::Healing => self.healing,
            StatField::Blocked => self.blocked,
        }
    }

    /// Apply a signed delta to one stat. `None` if the result would be
    /// negative or overflow; the player is left unchanged in that case.
    pub fn adjust_stat(&mut self, field: StatField, delta: i64) -> Option<u64> {
        let current = self.stat(field);
        let next = current.checked_add_signed(delta)?;
        let slot = match field {
            StatField::Kills => &mut self.kills,
            StatField::Deaths => &mut self.deaths,
            StatField::Assists => &mut self.assists,
            StatField::Damage => &mut self.damage,
            StatField::Healing => &mut self.healing,
            StatField::Blocked => &mut self.blocked,
        };
        *slot = next;
        Some(next)
    }

    /// Kills-deaths-assists ratio, `(kills + assists) / max(deaths, 1)`,
    /// rounded to two decimal places. Derived on every read so it cannot
    /// drift from the stats it is computed from.
    pub fn kda(&self) -> f64 {
        let numerator = (self.kills + self.assists) as f64;
        let denominator = self.deaths.max(1) as f64;
        (numerator / denominator * 100.0).round() / 100.0
    }
}
