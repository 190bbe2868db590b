//! Scoring helpers: round difficulty, per-player difficulty, score
//! application and the skip-roll odds.
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_LEVEL, MIN_LEVEL, ROUNDS_PER_LEVEL, SAFE_SKIP_STREAK_STEP, SCORE_SAFE_SKIP,
    SKIP_PUNISHMENT_BASE, SKIP_PUNISHMENT_CAP, SKIP_PUNISHMENT_STEP, SKIP_ROLL_SCALE,
    SKIP_SAFE_BASE, SKIP_SAFE_STEP,
};
use crate::numbers::round_half_up_to_i32;
use crate::player::Player;

/// Apply a base points change scaled by the player's daring multiplier.
///
/// Returns the delta actually added to the player's points.
pub fn apply_score(player: &mut Player, base_points: f64) -> i32 {
    let delta = scaled_points(player, base_points);
    player.stats.points = player.stats.points.saturating_add(delta);
    delta
}

/// Points a base change is worth for this player, without applying it.
#[must_use]
pub fn scaled_points(player: &Player, base_points: f64) -> i32 {
    round_half_up_to_i32(base_points * player.daring_level.multiplier())
}

/// Base penalty for a safe skip taken with `streak` prior consecutive skips.
#[must_use]
pub fn safe_skip_penalty(streak: u32) -> f64 {
    SCORE_SAFE_SKIP * SAFE_SKIP_STREAK_STEP.mul_add(f64::from(streak), 1.0)
}

/// Baseline difficulty for a round; steps up every two rounds, capped at 3.
///
/// Round 0 (before the first pick) maps to level 1.
#[must_use]
pub fn round_level(current_round: u32) -> u8 {
    let steps = current_round.saturating_sub(1) / ROUNDS_PER_LEVEL;
    let steps = u8::try_from(steps).unwrap_or(u8::MAX);
    MIN_LEVEL.saturating_add(steps).min(MAX_LEVEL)
}

/// Effective difficulty for a player: daring level can raise, never lower,
/// the round baseline.
#[must_use]
pub fn final_level(player: &Player, round_level: u8) -> u8 {
    player
        .daring_level
        .get()
        .max(round_level)
        .clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Three-way partition of a 100-point skip roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipChances {
    pub safe: u32,
    pub punishment: u32,
    pub worse_dare: u32,
}

impl SkipChances {
    /// Classify a roll drawn from `[0, 100)`.
    #[must_use]
    pub fn classify(&self, roll: f64) -> SkipRollResult {
        let safe = f64::from(self.safe);
        if roll < safe {
            SkipRollResult::Safe
        } else if roll < safe + f64::from(self.punishment) {
            SkipRollResult::Punishment
        } else {
            SkipRollResult::WorseDare
        }
    }

    /// Classify a unit draw from `[0, 1)` after scaling it to the roll range.
    #[must_use]
    pub fn classify_unit(&self, unit: f64) -> SkipRollResult {
        self.classify(unit * SKIP_ROLL_SCALE)
    }
}

/// Odds for the skip roll at a given streak.
///
/// The safe share shrinks by 10 per skip, the punishment share grows by 5
/// up to 70, and the worse-dare share takes the remainder, which stays
/// non-negative for every streak.
#[must_use]
pub fn calculate_skip_chances(streak: u32) -> SkipChances {
    let safe = SKIP_SAFE_BASE.saturating_sub(SKIP_SAFE_STEP.saturating_mul(streak));
    let punishment = SKIP_PUNISHMENT_BASE
        .saturating_add(SKIP_PUNISHMENT_STEP.saturating_mul(streak))
        .min(SKIP_PUNISHMENT_CAP);
    let worse_dare = 100 - safe - punishment;
    SkipChances {
        safe,
        punishment,
        worse_dare,
    }
}

/// Tag of the most recent skip roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipRollResult {
    Safe,
    Punishment,
    WorseDare,
}

impl std::fmt::Display for SkipRollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Punishment => write!(f, "punishment"),
            Self::WorseDare => write!(f, "worseDare"),
        }
    }
}
