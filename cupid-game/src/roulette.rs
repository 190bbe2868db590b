//! Weighted selection of the next player on trial.
use smallvec::SmallVec;

use crate::constants::{ROULETTE_BASE_WEIGHT, ROULETTE_MIN_WEIGHT, ROULETTE_REPEAT_WEIGHT};
use crate::player::{Player, PlayerId};
use crate::rng::{RandomSource, RollStream};

/// Per-player weights sized for the usual hotseat roster.
pub type RouletteWeights = SmallVec<[f64; 5]>;

/// Weights for the next spin.
///
/// The previous pick is damped to a fixed low weight. Everyone else starts
/// at the base weight plus one per consecutive skip, so dodgers come up more
/// often. No weight drops below the floor.
#[must_use]
pub fn roulette_weights(players: &[Player], last_picked: Option<PlayerId>) -> RouletteWeights {
    players
        .iter()
        .map(|player| {
            let weight = if Some(player.id) == last_picked {
                ROULETTE_REPEAT_WEIGHT
            } else {
                ROULETTE_BASE_WEIGHT + f64::from(player.stats.skip_streak)
            };
            weight.max(ROULETTE_MIN_WEIGHT)
        })
        .collect()
}

/// Draw an index proportionally to `weights`.
///
/// Returns `None` for an empty slice. When rounding pushes the draw past
/// the last boundary the first index wins.
pub fn weighted_pick<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    let mut remaining = rng.next_unit(RollStream::Roulette) * total;
    for (idx, weight) in weights.iter().enumerate() {
        if remaining < *weight {
            return Some(idx);
        }
        remaining -= weight;
    }
    Some(0)
}

/// Spin the roulette over a roster and return the chosen player's id.
pub fn spin<R: RandomSource + ?Sized>(
    players: &[Player],
    last_picked: Option<PlayerId>,
    rng: &mut R,
) -> Option<PlayerId> {
    let weights = roulette_weights(players, last_picked);
    weighted_pick(&weights, rng).and_then(|idx| players.get(idx).map(|p| p.id))
}
