//! Match flow: starting, the phase-advance table, roulette picks and reset.
use log::{debug, info, warn};

use super::GameStore;
use crate::constants::{FALLBACK_DARE, FALLBACK_EVENT, SCORE_EVENT};
use crate::phase::Phase;
use crate::player::PlayerId;
use crate::rng::{RandomSource, RollStream};
use crate::roulette::spin;
use crate::scoring::{apply_score, final_level, round_level};
use crate::state::initial_data;

impl<R: RandomSource> GameStore<R> {
    /// Begin a match if the roster fits the start window.
    ///
    /// Returns `false` and leaves the state untouched otherwise.
    pub fn start_game(&mut self) -> bool {
        let count = self.data.players.len();
        if !self.config.roster_can_start(count) {
            warn!(
                "cannot start with {count} players (need {}..={})",
                self.config.min_players_to_start, self.config.max_players_to_start
            );
            return false;
        }
        self.data.phase = Phase::Pregame;
        self.data.current_round = 0;
        self.data.latest_outcome = None;
        self.data.latest_event = None;
        info!(
            "match started: {count} players, {} rounds",
            self.data.total_rounds
        );
        true
    }

    /// Advance from the current phase and return the new phase.
    ///
    /// `roulette` and `round` wait on their dedicated actions and `summary`
    /// is terminal, so those phases are returned unchanged. After a turn
    /// resolves the match either ends, triggers a random event for the
    /// active player, or returns to the roulette.
    pub fn next_phase(&mut self) -> Phase {
        let from = self.data.phase;
        match from {
            Phase::Setup => {
                self.data.phase = Phase::Pregame;
                self.data.current_round = 0;
                self.data.latest_outcome = None;
                self.data.latest_event = None;
            }
            Phase::Pregame => {
                self.data.phase = Phase::Roulette;
                self.data.current_round = 0;
            }
            Phase::Event => {
                if !self.finish_if_exhausted() {
                    self.data.phase = Phase::Roulette;
                }
            }
            phase if phase.is_turn_resolution() => {
                if !self.finish_if_exhausted() {
                    self.maybe_trigger_event();
                }
            }
            _ => {
                debug!("next_phase: nothing to do in {from}");
                return from;
            }
        }
        debug!("phase {from} -> {}", self.data.phase);
        self.data.phase
    }

    fn finish_if_exhausted(&mut self) -> bool {
        if !self.data.rounds_exhausted() {
            return false;
        }
        self.data.phase = Phase::Summary;
        self.data.latest_event = None;
        self.data.latest_dare = None;
        info!(
            "match over after {} of {} rounds",
            self.data.current_round, self.data.total_rounds
        );
        true
    }

    fn maybe_trigger_event(&mut self) {
        let Self {
            data,
            prompts,
            config,
            rng,
        } = self;
        if rng.next_unit(RollStream::Event) >= config.random_event_probability {
            data.phase = Phase::Roulette;
            return;
        }
        if let Some(player) = data.active_player_mut() {
            player.stats.record_event();
            apply_score(player, SCORE_EVENT);
            debug!("random event credited to {}", player.name);
        }
        data.latest_event = Some(prompts.events.pick_any(rng, FALLBACK_EVENT));
        data.phase = Phase::Event;
    }

    /// Put the next player on trial and present their dare.
    ///
    /// With `Some(id)` that player is chosen directly; with `None` the
    /// roulette picks, damping whoever went last. Returns the chosen id, or
    /// `None` (leaving the state untouched) for an unknown id, an empty
    /// roster, or a match that has already ended.
    pub fn select_next_player(&mut self, requested: Option<PlayerId>) -> Option<PlayerId> {
        if self.data.phase.is_terminal() {
            warn!("select_next_player after the match ended");
            return None;
        }
        let Self { data, prompts, rng, .. } = self;
        let chosen = match requested {
            Some(id) => {
                if data.player(id).is_none() {
                    warn!("select_next_player: {id} not on roster");
                    return None;
                }
                id
            }
            None => {
                let Some(id) = spin(&data.players, data.active_player_id, rng) else {
                    warn!("select_next_player: roster is empty");
                    return None;
                };
                id
            }
        };
        let next_round = data.current_round.saturating_add(1);
        let level = data
            .player(chosen)
            .map_or_else(|| round_level(next_round), |p| final_level(p, round_level(next_round)));

        data.current_round = next_round;
        data.current_dare_level = level;
        data.active_player_id = Some(chosen);
        data.latest_dare = Some(prompts.dares.pick(level, rng, FALLBACK_DARE));
        data.latest_outcome = None;
        data.latest_event = None;
        data.skip_roll_result = None;
        data.phase = Phase::Round;
        debug!("round {next_round}: {chosen} on trial at level {level}");
        Some(chosen)
    }

    /// Return to a fresh setup state, keeping the music preference.
    pub fn reset_game(&mut self) {
        let music = self.data.bg_music_enabled;
        self.data = initial_data(&self.config);
        self.data.bg_music_enabled = music;
        info!("game reset");
    }

    /// Set or flip background music and return the new setting.
    pub fn toggle_bg_music(&mut self, enabled: Option<bool>) -> bool {
        let next = enabled.unwrap_or(!self.data.bg_music_enabled);
        self.data.bg_music_enabled = next;
        debug!("background music {}", if next { "on" } else { "off" });
        next
    }
}
