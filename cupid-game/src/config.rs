//! Match configuration: the structural tunables table variants disagree on.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when match configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("{field} must be a probability in [0, 1] (got {value:.3})")]
    Probability { field: &'static str, value: f64 },
}

/// Tunables for a single hotseat match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_min_rounds")]
    pub min_rounds: u32,
    #[serde(default = "GameConfig::default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "GameConfig::default_rounds")]
    pub default_rounds: u32,
    /// Hard cap on roster size while adding players.
    #[serde(default = "GameConfig::default_roster_capacity")]
    pub roster_capacity: u32,
    #[serde(default = "GameConfig::default_min_players")]
    pub min_players_to_start: u32,
    #[serde(default = "GameConfig::default_max_players")]
    pub max_players_to_start: u32,
    #[serde(default = "GameConfig::default_event_probability")]
    pub random_event_probability: f64,
    /// Skip streak at which skipping a dare forces a punishment.
    #[serde(default = "GameConfig::default_forced_punishment_streak")]
    pub forced_punishment_streak: u32,
    /// Whether the forced-punishment ceiling also guards punishment skips.
    #[serde(default)]
    pub punishment_skip_ceiling: bool,
}

impl GameConfig {
    const fn default_min_rounds() -> u32 {
        1
    }

    const fn default_max_rounds() -> u32 {
        15
    }

    const fn default_rounds() -> u32 {
        3
    }

    const fn default_roster_capacity() -> u32 {
        5
    }

    const fn default_min_players() -> u32 {
        3
    }

    const fn default_max_players() -> u32 {
        5
    }

    const fn default_event_probability() -> f64 {
        0.25
    }

    const fn default_forced_punishment_streak() -> u32 {
        4
    }

    /// Parse a configuration override document. Missing fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rounds < 1 {
            return Err(ConfigError::MinViolation {
                field: "min_rounds",
                min: 1,
                value: self.min_rounds,
            });
        }
        if self.min_rounds > self.max_rounds {
            return Err(ConfigError::InvertedBounds {
                field: "rounds",
                min: self.min_rounds,
                max: self.max_rounds,
            });
        }
        if !(self.min_rounds..=self.max_rounds).contains(&self.default_rounds) {
            return Err(ConfigError::RangeViolation {
                field: "default_rounds",
                min: self.min_rounds,
                max: self.max_rounds,
                value: self.default_rounds,
            });
        }
        if self.min_players_to_start < 1 {
            return Err(ConfigError::MinViolation {
                field: "min_players_to_start",
                min: 1,
                value: self.min_players_to_start,
            });
        }
        if self.min_players_to_start > self.max_players_to_start {
            return Err(ConfigError::InvertedBounds {
                field: "players_to_start",
                min: self.min_players_to_start,
                max: self.max_players_to_start,
            });
        }
        if self.max_players_to_start > self.roster_capacity {
            return Err(ConfigError::RangeViolation {
                field: "max_players_to_start",
                min: self.min_players_to_start,
                max: self.roster_capacity,
                value: self.max_players_to_start,
            });
        }
        if !(0.0..=1.0).contains(&self.random_event_probability) {
            return Err(ConfigError::Probability {
                field: "random_event_probability",
                value: self.random_event_probability,
            });
        }
        if self.forced_punishment_streak < 1 {
            return Err(ConfigError::MinViolation {
                field: "forced_punishment_streak",
                min: 1,
                value: self.forced_punishment_streak,
            });
        }
        Ok(())
    }

    /// Clamp a requested round count into the configured bounds.
    #[must_use]
    pub fn clamp_rounds(&self, rounds: u32) -> u32 {
        rounds.clamp(self.min_rounds, self.max_rounds.max(self.min_rounds))
    }

    /// Whether a roster of `count` players may start a match.
    #[must_use]
    pub fn roster_can_start(&self, count: usize) -> bool {
        u32::try_from(count).is_ok_and(|count| {
            (self.min_players_to_start..=self.max_players_to_start).contains(&count)
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_rounds: Self::default_min_rounds(),
            max_rounds: Self::default_max_rounds(),
            default_rounds: Self::default_rounds(),
            roster_capacity: Self::default_roster_capacity(),
            min_players_to_start: Self::default_min_players(),
            max_players_to_start: Self::default_max_players(),
            random_event_probability: Self::default_event_probability(),
            forced_punishment_streak: Self::default_forced_punishment_streak(),
            punishment_skip_ceiling: false,
        }
    }
}
