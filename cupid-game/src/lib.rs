//! Cupid.exe Game Engine
//!
//! Platform-agnostic core logic for the Cupid.exe dare-or-punishment party
//! game: the phase state machine, the skip roll, roulette selection and
//! scoring. Rendering, navigation, audio and haptics live outside this
//! crate and drive it through [`GameStore`].

pub mod characters;
pub mod config;
pub mod constants;
pub mod numbers;
pub mod phase;
pub mod player;
pub mod prompts;
pub mod rng;
pub mod roulette;
pub mod scoring;
pub mod seed;
pub mod state;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use characters::{CHARACTERS, Character, character_by_id};
pub use config::{ConfigError, GameConfig};
pub use phase::{Phase, route_for_phase, route_for_phase_name};
pub use player::{DaringLevel, NewPlayer, Player, PlayerId, PlayerStats, RosterError};
pub use prompts::{DataError, PromptDeck, PromptLibrary, PromptPool, pick_random};
pub use rng::{CountingRng, FixedRandom, RandomSource, RngBundle, RollStream, ScriptedRandom};
pub use roulette::{RouletteWeights, roulette_weights, spin, weighted_pick};
pub use scoring::{
    SkipChances, SkipRollResult, apply_score, calculate_skip_chances, final_level, round_level,
    safe_skip_penalty, scaled_points,
};
pub use seed::{decode_party_code, encode_party_code, generate_party_code, parse_seed_input};
pub use state::{GameData, initial_data};
pub use store::GameStore;
pub use summary::{
    Award, DeluluTier, HeadlineAwards, PlayerSummary, delulu_score, game_summary,
    headline_awards, leaderboard, podium,
};

const DEFAULT_CONFIG: &str = "{}";

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the dare, punishment and event prompt pools
    ///
    /// # Errors
    ///
    /// Returns an error if a prompt document cannot be loaded.
    fn load_prompts(&self) -> Result<PromptLibrary, Self::Error>;

    /// Load the match configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<GameConfig, Self::Error>;
}

/// Loader serving the assets compiled into the crate.
#[derive(Debug, Clone, Default)]
pub struct StaticDataLoader {
    config_json: Option<String>,
}

impl StaticDataLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self { config_json: None }
    }

    /// Use a JSON configuration override instead of the defaults.
    #[must_use]
    pub fn with_config_json(mut self, json: impl Into<String>) -> Self {
        self.config_json = Some(json.into());
        self
    }
}

impl DataLoader for StaticDataLoader {
    type Error = DataError;

    fn load_prompts(&self) -> Result<PromptLibrary, Self::Error> {
        PromptLibrary::bundled()
    }

    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        let json = self.config_json.as_deref().unwrap_or(DEFAULT_CONFIG);
        GameConfig::from_json(json).map_err(|source| DataError::Parse {
            asset: "config",
            source,
        })
    }
}

/// Errors raised while building a store from loaded data.
#[derive(Debug, thiserror::Error)]
pub enum EngineError<E: std::error::Error + Send + Sync + 'static> {
    #[error("failed to load game data: {0}")]
    Load(#[source] E),
    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Main game engine for creating match stores
pub struct GameEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> GameEngine<L>
where
    L: DataLoader,
{
    /// Create a new game engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    #[must_use]
    pub const fn data_loader(&self) -> &L {
        &self.data_loader
    }

    /// Create a new match store seeded for reproducible rolls
    ///
    /// # Errors
    ///
    /// Returns an error if data cannot be loaded or the configuration is
    /// inconsistent.
    pub fn create_game(&self, seed: u64) -> Result<GameStore<RngBundle>, EngineError<L::Error>> {
        self.create_game_with(RngBundle::from_user_seed(seed))
    }

    /// Create a new match store drawing from a caller-provided source
    ///
    /// # Errors
    ///
    /// Returns an error if data cannot be loaded or the configuration is
    /// inconsistent.
    pub fn create_game_with<R: RandomSource>(
        &self,
        rng: R,
    ) -> Result<GameStore<R>, EngineError<L::Error>> {
        let config = self.data_loader.load_config().map_err(EngineError::Load)?;
        config.validate()?;
        let prompts = self.data_loader.load_prompts().map_err(EngineError::Load)?;
        log::info!(
            "engine created store: {} dares, {} punishments, {} events",
            prompts.dares.len(),
            prompts.punishments.len(),
            prompts.events.len()
        );
        Ok(GameStore::new(config, prompts, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_prompts(&self) -> Result<PromptLibrary, Self::Error> {
            Ok(PromptLibrary::empty())
        }

        fn load_config(&self) -> Result<GameConfig, Self::Error> {
            Ok(GameConfig {
                max_rounds: 30,
                ..GameConfig::default()
            })
        }
    }

    #[test]
    fn engine_creates_fresh_stores() {
        let engine = GameEngine::new(FixtureLoader);
        let mut store = engine.create_game(0xABCD).unwrap();
        assert_eq!(store.phase(), Phase::Setup);
        assert_eq!(store.set_total_rounds(25), 25);
        assert_eq!(store.rng().seed(), 0xABCD);
    }

    #[test]
    fn empty_prompts_fall_back_to_placeholder_dare() {
        let engine = GameEngine::new(FixtureLoader);
        let mut store = engine.create_game_with(FixedRandom(0.0)).unwrap();
        store
            .add_player(NewPlayer::new("Aria", 1, "", "victim-1"))
            .unwrap();
        store.select_next_player(None);
        assert_eq!(store.latest_dare(), Some(constants::FALLBACK_DARE));
    }

    #[test]
    fn static_loader_serves_bundled_assets() {
        let engine = GameEngine::new(StaticDataLoader::new());
        let store = engine.create_game(1).unwrap();
        assert!(!store.prompts().dares.is_empty());
        assert_eq!(store.config(), &GameConfig::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let loader = StaticDataLoader::new().with_config_json(r#"{ "min_rounds": 9, "max_rounds": 2 }"#);
        let engine = GameEngine::new(loader);
        assert!(matches!(
            engine.create_game(1),
            Err(EngineError::Config(ConfigError::InvertedBounds { .. }))
        ));

        let broken = GameEngine::new(StaticDataLoader::new().with_config_json("{"));
        assert!(matches!(broken.create_game(1), Err(EngineError::Load(_))));
    }
}
