//! Roster actions: joining, leaving and match length.
use log::{debug, warn};

use super::GameStore;
use crate::player::{NewPlayer, Player, PlayerId, RosterError};
use crate::rng::RandomSource;

impl<R: RandomSource> GameStore<R> {
    /// Register a player with fresh stats and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Full`] when the roster is at capacity, or a
    /// validation error for an incomplete or unknown entry.
    pub fn add_player(&mut self, entry: NewPlayer) -> Result<PlayerId, RosterError> {
        let capacity = self.config.roster_capacity;
        let full = u32::try_from(self.data.players.len()).map_or(true, |len| len >= capacity);
        if full {
            warn!("roster full ({capacity}); rejecting {}", entry.name.trim());
            return Err(RosterError::Full { capacity });
        }
        if let Err(err) = entry.validate() {
            warn!("rejecting roster entry: {err}");
            return Err(err);
        }
        let id = self.data.allocate_player_id();
        let player = Player::new(id, entry);
        debug!("added {} as {id}", player.name);
        self.data.players.push(player);
        Ok(id)
    }

    /// Remove a player by id. Returns whether anyone was removed.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let before = self.data.players.len();
        self.data.players.retain(|p| p.id != id);
        let removed = self.data.players.len() != before;
        if removed {
            debug!("removed {id}");
        } else {
            debug!("remove_player: {id} not on roster");
        }
        removed
    }

    /// Set the match length, clamped into the configured bounds.
    pub fn set_total_rounds(&mut self, rounds: u32) -> u32 {
        let clamped = self.config.clamp_rounds(rounds);
        if clamped != rounds {
            debug!("total rounds {rounds} clamped to {clamped}");
        }
        self.data.total_rounds = clamped;
        clamped
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::player::{NewPlayer, PlayerId, RosterError};
    use crate::prompts::PromptLibrary;
    use crate::rng::FixedRandom;
    use crate::store::GameStore;

    fn store() -> GameStore<FixedRandom> {
        GameStore::new(GameConfig::default(), PromptLibrary::empty(), FixedRandom(0.5))
    }

    fn entry(name: &str) -> NewPlayer {
        NewPlayer::new(name, 2, "", "victim-2")
    }

    #[test]
    fn add_player_assigns_unique_ids_and_zeroed_stats() {
        let mut store = store();
        let a = store.add_player(entry("Aria")).unwrap();
        let b = store.add_player(entry("Jules")).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.players().len(), 2);
        assert_eq!(store.players()[0].name, "Aria");
        assert_eq!(store.players()[1].stats.points, 0);
        assert_eq!(store.players()[1].crush, "Unknown");
    }

    #[test]
    fn add_player_rejects_when_full() {
        let mut store = store();
        for name in ["A", "B", "C", "D", "E"] {
            store.add_player(entry(name)).unwrap();
        }
        assert_eq!(
            store.add_player(entry("F")),
            Err(RosterError::Full { capacity: 5 })
        );
        assert_eq!(store.players().len(), 5);
    }

    #[test]
    fn add_player_rejects_invalid_entries() {
        let mut store = store();
        assert_eq!(
            store.add_player(NewPlayer::new("", 1, "", "victim-1")),
            Err(RosterError::MissingName)
        );
        assert!(store.players().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = store();
        let a = store.add_player(entry("Aria")).unwrap();
        assert!(store.remove_player(a));
        let b = store.add_player(entry("Jules")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_unknown_player_is_a_noop() {
        let mut store = store();
        store.add_player(entry("Aria")).unwrap();
        assert!(!store.remove_player(PlayerId(99)));
        assert_eq!(store.players().len(), 1);
    }

    #[test]
    fn set_total_rounds_clamps() {
        let mut store = store();
        assert_eq!(store.set_total_rounds(0), 1);
        assert_eq!(store.set_total_rounds(20), 15);
        assert_eq!(store.set_total_rounds(6), 6);
        assert_eq!(store.total_rounds(), 6);
    }
}
