//! Root match state owned by the store.
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::MIN_LEVEL;
use crate::phase::Phase;
use crate::player::{Player, PlayerId};
use crate::scoring::SkipRollResult;

/// Everything a match tracks between actions.
///
/// The player on trial is held by id only and looked up on read, so there
/// is no separate copy of the active player to keep in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub phase: Phase,
    pub total_rounds: u32,
    /// Incremented on every roulette pick; 0 before the first pick.
    pub current_round: u32,
    pub current_dare_level: u8,
    /// Roster in insertion order.
    pub players: Vec<Player>,
    pub active_player_id: Option<PlayerId>,
    pub latest_dare: Option<String>,
    pub latest_outcome: Option<String>,
    pub latest_event: Option<String>,
    pub skip_roll_result: Option<SkipRollResult>,
    pub bg_music_enabled: bool,
    /// Next id handed out by `add_player`; never reused within a session.
    #[serde(default = "GameData::first_player_id")]
    pub next_player_id: u32,
}

impl GameData {
    const fn first_player_id() -> u32 {
        1
    }

    /// Fresh state for a new session.
    #[must_use]
    pub fn new(total_rounds: u32) -> Self {
        Self {
            phase: Phase::Setup,
            total_rounds,
            current_round: 0,
            current_dare_level: MIN_LEVEL,
            players: Vec::new(),
            active_player_id: None,
            latest_dare: None,
            latest_outcome: None,
            latest_event: None,
            skip_roll_result: None,
            bg_music_enabled: true,
            next_player_id: Self::first_player_id(),
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player on trial, if one is set and still on the roster.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.active_player_id.and_then(|id| self.player(id))
    }

    pub fn active_player_mut(&mut self) -> Option<&mut Player> {
        let id = self.active_player_id?;
        self.player_mut(id)
    }

    /// Whether every configured round has been played.
    #[must_use]
    pub const fn rounds_exhausted(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    pub(crate) fn allocate_player_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id = self.next_player_id.saturating_add(1);
        id
    }
}

impl Default for GameData {
    fn default() -> Self {
        initial_data(&GameConfig::default())
    }
}

/// Initial state for a configuration.
#[must_use]
pub fn initial_data(config: &GameConfig) -> GameData {
    GameData::new(config.clamp_rounds(config.default_rounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::NewPlayer;

    #[test]
    fn initial_data_starts_in_setup() {
        let data = initial_data(&GameConfig::default());
        assert_eq!(data.phase, Phase::Setup);
        assert_eq!(data.total_rounds, 3);
        assert_eq!(data.current_round, 0);
        assert_eq!(data.current_dare_level, 1);
        assert!(data.players.is_empty());
        assert!(data.active_player().is_none());
        assert!(data.bg_music_enabled);
    }

    #[test]
    fn active_player_is_derived_from_roster() {
        let mut data = GameData::default();
        let id = data.allocate_player_id();
        data.players
            .push(Player::new(id, NewPlayer::new("Aria", 2, "Jules", "victim-1")));
        data.active_player_id = Some(id);
        assert_eq!(data.active_player().map(|p| p.name.as_str()), Some("Aria"));

        data.players.clear();
        assert!(data.active_player().is_none());
        assert!(data.active_player_mut().is_none());
    }

    #[test]
    fn allocated_ids_are_unique() {
        let mut data = GameData::default();
        let a = data.allocate_player_id();
        let b = data.allocate_player_id();
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_serializes_with_kebab_phase() {
        let data = GameData::default();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["phase"], "setup");
        let back: GameData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
