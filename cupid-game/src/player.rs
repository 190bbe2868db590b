//! Roster entities: players, their daring level and running statistics.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::characters::character_by_id;
use crate::constants::{
    DARING_MULT_HIGH, DARING_MULT_LOW, DARING_MULT_MEDIUM, MAX_LEVEL, MIN_LEVEL,
    PLAYER_ID_PREFIX, UNKNOWN_CRUSH,
};

/// Stable identifier assigned when a player joins the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PLAYER_ID_PREFIX}{}", self.0)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(PLAYER_ID_PREFIX).unwrap_or(s);
        digits.parse().map(Self)
    }
}

/// Player-chosen risk affinity, always within `[1, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DaringLevel(u8);

impl DaringLevel {
    pub const LOW: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const HIGH: Self = Self(3);

    /// Build a daring level, clamping out-of-range input.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.clamp(MIN_LEVEL, MAX_LEVEL))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Score multiplier applied to every points change for this level.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self.0 {
            1 => DARING_MULT_LOW,
            3 => DARING_MULT_HIGH,
            _ => DARING_MULT_MEDIUM,
        }
    }
}

impl Default for DaringLevel {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<u8> for DaringLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("daring level {value} outside {MIN_LEVEL}..={MAX_LEVEL}"))
        }
    }
}

impl From<DaringLevel> for u8 {
    fn from(level: DaringLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points: i32,
    pub successes: u32,
    pub failures: u32,
    pub skips: u32,
    /// Consecutive skips since the last validated proof.
    pub skip_streak: u32,
    pub punishments: u32,
    pub events_triggered: u32,
}

impl PlayerStats {
    /// Count a skip attempt of any outcome.
    pub const fn record_skip(&mut self) {
        self.skips = self.skips.saturating_add(1);
        self.skip_streak = self.skip_streak.saturating_add(1);
    }

    /// Count a skip attempt that ended in a punishment.
    pub const fn record_punished_skip(&mut self) {
        self.record_skip();
        self.punishments = self.punishments.saturating_add(1);
    }

    /// Count a validated proof; clears the skip streak.
    pub const fn record_success(&mut self) {
        self.successes = self.successes.saturating_add(1);
        self.skip_streak = 0;
    }

    pub const fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    pub const fn record_event(&mut self) {
        self.events_triggered = self.events_triggered.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub daring_level: DaringLevel,
    pub crush: String,
    pub character_id: String,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, entry: NewPlayer) -> Self {
        let crush = entry.crush.trim();
        Self {
            id,
            name: entry.name.trim().to_string(),
            daring_level: entry.daring_level,
            crush: if crush.is_empty() {
                UNKNOWN_CRUSH.to_string()
            } else {
                crush.to_string()
            },
            character_id: entry.character_id.trim().to_string(),
            stats: PlayerStats::default(),
        }
    }
}

/// Errors surfaced while registering a player.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster is full ({capacity} players)")]
    Full { capacity: u32 },
    #[error("player name is required")]
    MissingName,
    #[error("player character is required")]
    MissingCharacter,
    #[error("unknown character `{0}`")]
    UnknownCharacter(String),
}

/// Data collected by the add-player flow before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub daring_level: DaringLevel,
    #[serde(default)]
    pub crush: String,
    pub character_id: String,
}

impl NewPlayer {
    #[must_use]
    pub fn new(name: &str, daring_level: u8, crush: &str, character_id: &str) -> Self {
        Self {
            name: name.to_string(),
            daring_level: DaringLevel::new(daring_level),
            crush: crush.to_string(),
            character_id: character_id.to_string(),
        }
    }

    /// Whether the entry flow has collected everything a player needs: a
    /// non-blank name and a character.
    ///
    /// The crush is optional here. A blank crush joins the roster as
    /// "Unknown", so it never blocks the entry.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.character_id.trim().is_empty()
    }

    /// Validate the entry against the character catalog.
    ///
    /// # Errors
    ///
    /// Returns the first missing or unknown field.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.name.trim().is_empty() {
            return Err(RosterError::MissingName);
        }
        let character_id = self.character_id.trim();
        if character_id.is_empty() {
            return Err(RosterError::MissingCharacter);
        }
        if character_by_id(character_id).is_none() {
            return Err(RosterError::UnknownCharacter(character_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_displays_and_parses_with_prefix() {
        let id = PlayerId(7);
        assert_eq!(id.to_string(), "player-7");
        assert_eq!("player-7".parse::<PlayerId>(), Ok(id));
        assert_eq!("12".parse::<PlayerId>(), Ok(PlayerId(12)));
        assert!("player-x".parse::<PlayerId>().is_err());
    }

    #[test]
    fn daring_level_clamps_and_maps_multipliers() {
        assert_eq!(DaringLevel::new(0), DaringLevel::LOW);
        assert_eq!(DaringLevel::new(9), DaringLevel::HIGH);
        assert!((DaringLevel::LOW.multiplier() - 0.8).abs() < f64::EPSILON);
        assert!((DaringLevel::MEDIUM.multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((DaringLevel::HIGH.multiplier() - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn daring_level_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<DaringLevel>("2").is_ok());
        assert!(serde_json::from_str::<DaringLevel>("4").is_err());
    }

    #[test]
    fn new_player_defaults_blank_crush_to_unknown() {
        let player = Player::new(PlayerId(1), NewPlayer::new("  Aria ", 2, "   ", "victim-1"));
        assert_eq!(player.name, "Aria");
        assert_eq!(player.crush, "Unknown");
        assert_eq!(player.stats, PlayerStats::default());
    }

    #[test]
    fn validate_reports_missing_and_unknown_fields() {
        assert_eq!(
            NewPlayer::new(" ", 1, "", "victim-1").validate(),
            Err(RosterError::MissingName)
        );
        assert_eq!(
            NewPlayer::new("Jules", 1, "", "").validate(),
            Err(RosterError::MissingCharacter)
        );
        assert_eq!(
            NewPlayer::new("Jules", 1, "", "robot").validate(),
            Err(RosterError::UnknownCharacter("robot".to_string()))
        );
        assert!(NewPlayer::new("Jules", 1, "Mika", "victim-2").validate().is_ok());
    }

    #[test]
    fn stat_recorders_track_streak() {
        let mut stats = PlayerStats::default();
        stats.record_skip();
        stats.record_punished_skip();
        assert_eq!((stats.skips, stats.skip_streak, stats.punishments), (2, 2, 1));
        stats.record_failure();
        assert_eq!(stats.skip_streak, 2);
        stats.record_success();
        assert_eq!((stats.successes, stats.failures, stats.skip_streak), (1, 1, 0));
        stats.record_event();
        assert_eq!(stats.events_triggered, 1);
    }

    #[test]
    fn is_complete_requires_name_and_character() {
        assert!(!NewPlayer::default().is_complete());
        assert!(NewPlayer::new("Mika", 3, "", "victim-3").is_complete());
        assert!(NewPlayer::new("Mika", 3, "   ", "victim-3").is_complete());
        assert!(!NewPlayer::new("  ", 3, "Jules", "victim-3").is_complete());
        assert!(!NewPlayer::new("Mika", 3, "Jules", " ").is_complete());
    }
}
