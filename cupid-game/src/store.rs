//! The match store: root state plus the action surface that mutates it.
//!
//! Every mutation goes through a method on [`GameStore`]. Actions run to
//! completion synchronously; guard violations (no active player, unknown
//! ids, roster outside the start window) are logged and leave the state
//! untouched instead of raising errors.
use log::warn;

use crate::config::GameConfig;
use crate::phase::Phase;
use crate::player::Player;
use crate::prompts::{DataError, PromptLibrary};
use crate::rng::{RandomSource, RngBundle};
use crate::scoring::SkipRollResult;
use crate::state::{GameData, initial_data};

mod dare;
mod flow;
mod roster;

/// Owning context for one hotseat session.
#[derive(Debug, Clone)]
pub struct GameStore<R: RandomSource = RngBundle> {
    data: GameData,
    prompts: PromptLibrary,
    config: GameConfig,
    rng: R,
}

impl GameStore<RngBundle> {
    /// Store with the default configuration and bundled prompts, seeded for
    /// reproducible rolls.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled prompt assets fail to parse.
    pub fn with_seed(seed: u64) -> Result<Self, DataError> {
        Ok(Self::new(
            GameConfig::default(),
            PromptLibrary::bundled()?,
            RngBundle::from_user_seed(seed),
        ))
    }
}

impl<R: RandomSource> GameStore<R> {
    #[must_use]
    pub fn new(config: GameConfig, prompts: PromptLibrary, rng: R) -> Self {
        Self {
            data: initial_data(&config),
            prompts,
            config,
            rng,
        }
    }

    /// Borrow the full state snapshot.
    #[must_use]
    pub const fn data(&self) -> &GameData {
        &self.data
    }

    /// Apply a closure to the mutable state. Fixture support for staging a
    /// position directly; game code mutates through the action methods.
    #[doc(hidden)]
    pub fn with_data_mut<T>(&mut self, f: impl FnOnce(&mut GameData) -> T) -> T {
        f(&mut self.data)
    }

    #[must_use]
    pub fn into_data(self) -> GameData {
        self.data
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn prompts(&self) -> &PromptLibrary {
        &self.prompts
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.data.phase
    }

    /// Route the UI should show for the current phase.
    #[must_use]
    pub const fn route(&self) -> &'static str {
        self.data.phase.route()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.data.players
    }

    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.data.active_player()
    }

    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.data.current_round
    }

    #[must_use]
    pub const fn total_rounds(&self) -> u32 {
        self.data.total_rounds
    }

    #[must_use]
    pub const fn current_dare_level(&self) -> u8 {
        self.data.current_dare_level
    }

    #[must_use]
    pub fn latest_dare(&self) -> Option<&str> {
        self.data.latest_dare.as_deref()
    }

    #[must_use]
    pub fn latest_outcome(&self) -> Option<&str> {
        self.data.latest_outcome.as_deref()
    }

    #[must_use]
    pub fn latest_event(&self) -> Option<&str> {
        self.data.latest_event.as_deref()
    }

    #[must_use]
    pub const fn skip_roll_result(&self) -> Option<SkipRollResult> {
        self.data.skip_roll_result
    }

    #[must_use]
    pub const fn bg_music_enabled(&self) -> bool {
        self.data.bg_music_enabled
    }

    /// Whether a turn action may run: the match is not over and a player is
    /// on trial.
    fn turn_open(&self, action: &str) -> bool {
        if self.data.phase.is_terminal() {
            warn!("{action} after the match ended");
            return false;
        }
        if self.data.active_player().is_none() {
            warn!("{action} without an active player");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::NewPlayer;
    use crate::rng::FixedRandom;

    #[test]
    fn seeded_store_starts_fresh() {
        let store = GameStore::with_seed(42).unwrap();
        assert_eq!(store.phase(), Phase::Setup);
        assert_eq!(store.route(), "/");
        assert_eq!(store.total_rounds(), 3);
        assert_eq!(store.current_dare_level(), 1);
        assert!(store.players().is_empty());
        assert!(store.active_player().is_none());
        assert!(store.latest_dare().is_none());
        assert!(store.skip_roll_result().is_none());
        assert!(store.bg_music_enabled());
        assert_eq!(store.rng().seed(), 42);
    }

    #[test]
    fn with_data_mut_stages_positions() {
        let mut store = GameStore::new(
            GameConfig::default(),
            PromptLibrary::empty(),
            FixedRandom(0.5),
        );
        let id = store
            .add_player(NewPlayer::new("Aria", 2, "Jules", "victim-1"))
            .unwrap();
        store.with_data_mut(|data| {
            data.phase = Phase::Round;
            data.active_player_id = Some(id);
        });
        assert_eq!(store.route(), "/round");
        assert_eq!(store.active_player().map(|p| p.id), Some(id));
        assert_eq!(store.into_data().players.len(), 1);
    }
}
