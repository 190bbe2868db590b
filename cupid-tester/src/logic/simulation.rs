use std::collections::BTreeMap;

use anyhow::{Context, Result};
use cupid_game::constants::{MAX_LEVEL, MIN_LEVEL};
use cupid_game::{
    CHARACTERS, GameData, GameEngine, GameStore, NewPlayer, Phase, PlayerId, PlayerSummary,
    SkipRollResult, StaticDataLoader, game_summary,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, Response, TurnView};

pub const DEFAULT_MAX_STEPS: usize = 2_000;
const DIGEST_SEED: u64 = 0x00C0_FFEE;
const MAX_RECORDED_VIOLATIONS: usize = 20;

const PLAYER_NAMES: [&str; 5] = ["Aria", "Jules", "Mika", "Noor", "Sol"];
const CRUSHES: [&str; 5] = ["Rin", "Theo", "", "Lux", "Wren"];

/// Configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub players: usize,
    pub rounds: u32,
    pub max_steps: usize,
    /// JSON override handed to the engine's configuration loader.
    pub config_json: Option<String>,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            players: 3,
            rounds: 5,
            max_steps: DEFAULT_MAX_STEPS,
            config_json: None,
        }
    }

    #[must_use]
    pub const fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn with_config_json(mut self, json: Option<String>) -> Self {
        self.config_json = json;
        self
    }
}

/// Engine action taken on behalf of the active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    AcceptDare,
    SkipDare,
    AcceptPunishment,
    SkipPunishment,
    ProofValid,
    ProofInvalid,
    Event,
}

/// Snapshot of one resolved action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub round: u32,
    pub player: PlayerId,
    pub daring: u8,
    pub action: ActionKind,
    pub streak_before: u32,
    pub result: Option<SkipRollResult>,
    pub points_delta: i32,
    pub phase_after: Phase,
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    player: PlayerId,
    daring: u8,
    round: u32,
    streak_before: u32,
    points_before: i32,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub config: SimulationConfig,
    pub started: bool,
    pub reached_summary: bool,
    pub steps: usize,
    pub total_rounds: u32,
    pub rounds_played: u32,
    pub forced_streak: u32,
    pub actions: Vec<ActionRecord>,
    pub picks: Vec<PlayerId>,
    pub violations: Vec<String>,
    pub standings: Vec<PlayerSummary>,
    pub final_state: GameData,
    pub digest: u64,
}

impl SimulationSummary {
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.config.seed
    }

    #[must_use]
    pub const fn strategy(&self) -> GameplayStrategy {
        self.config.strategy
    }

    pub fn actions_of(&self, kind: ActionKind) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(move |record| record.action == kind)
    }

    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions_of(kind).count()
    }

    #[must_use]
    pub fn skip_results(&self, result: SkipRollResult) -> usize {
        self.actions
            .iter()
            .filter(|record| record.result == Some(result))
            .count()
    }

    #[must_use]
    pub fn pick_counts(&self) -> BTreeMap<PlayerId, usize> {
        let mut counts = BTreeMap::new();
        for id in &self.picks {
            *counts.entry(*id).or_insert(0) += 1;
        }
        counts
    }

    /// Roulette picks that repeated the previous pick.
    #[must_use]
    pub fn repeat_picks(&self) -> usize {
        self.picks.windows(2).filter(|w| w[0] == w[1]).count()
    }

    /// Name of the highest scorer; the earliest seat wins ties.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        let best = self.standings.iter().map(|row| row.points).max()?;
        self.standings
            .iter()
            .find(|row| row.points == best)
            .map(|row| row.name.as_str())
    }
}

/// Core deterministic simulation harness used by the tester.
pub struct SimulationSession {
    config: SimulationConfig,
    store: GameStore,
    policy: Box<dyn PlayerPolicy + Send>,
    actions: Vec<ActionRecord>,
    picks: Vec<PlayerId>,
    violations: Vec<String>,
    dare_attempts: u32,
    punishment_attempts: u32,
    steps: usize,
}

impl SimulationSession {
    /// Build a session around a fresh engine store.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the configuration override.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut loader = StaticDataLoader::new();
        if let Some(json) = &config.config_json {
            loader = loader.with_config_json(json.clone());
        }
        let store = GameEngine::new(loader)
            .create_game(config.seed)
            .with_context(|| format!("creating store for seed {}", config.seed))?;
        let policy = config.strategy.create_policy(config.seed);
        Ok(Self {
            config,
            store,
            policy,
            actions: Vec::new(),
            picks: Vec::new(),
            violations: Vec::new(),
            dare_attempts: 0,
            punishment_attempts: 0,
            steps: 0,
        })
    }

    fn seat_players(&mut self) {
        for idx in 0..self.config.players {
            let name = PLAYER_NAMES
                .get(idx)
                .map_or_else(|| format!("Guest {}", idx + 1), |name| (*name).to_string());
            let daring = u8::try_from(idx % 3 + 1).unwrap_or(1);
            let crush = CRUSHES[idx % CRUSHES.len()];
            let character = CHARACTERS[idx % CHARACTERS.len()].id;
            if let Err(err) = self
                .store
                .add_player(NewPlayer::new(&name, daring, crush, character))
            {
                warn!("could not seat {name}: {err}");
            }
        }
    }

    /// Play a whole match with the configured policy.
    #[must_use]
    pub fn run(mut self) -> SimulationSummary {
        self.seat_players();
        let total_rounds = self.store.set_total_rounds(self.config.rounds);
        let started = self.store.start_game();
        if started {
            self.store.next_phase();
            self.play();
        } else {
            info!(
                "seed {}: match did not start with {} players",
                self.config.seed,
                self.store.players().len()
            );
        }
        self.finish(started, total_rounds)
    }

    fn play(&mut self) {
        while self.steps < self.config.max_steps {
            self.steps += 1;
            match self.store.phase() {
                Phase::Summary => break,
                Phase::Roulette => {
                    if !self.spin() {
                        break;
                    }
                }
                Phase::Round => self.respond_to_dare(),
                Phase::Punishment => self.respond_to_punishment(),
                Phase::Proof => {
                    self.judge_proof();
                    self.advance();
                }
                Phase::Setup | Phase::Pregame | Phase::SafeSkip | Phase::Event => self.advance(),
            }
            self.check_invariants();
        }
    }

    fn spin(&mut self) -> bool {
        let Some(id) = self.store.select_next_player(None) else {
            self.violation("roulette produced no player");
            return false;
        };
        self.picks.push(id);
        self.dare_attempts = 0;
        self.punishment_attempts = 0;
        true
    }

    fn consult<T>(
        &mut self,
        attempts: u32,
        f: impl FnOnce(&mut dyn PlayerPolicy, &TurnView<'_>) -> T,
    ) -> Option<T> {
        let player = self.store.active_player()?;
        let view = TurnView {
            player,
            round: self.store.current_round(),
            level: self.store.current_dare_level(),
            attempts,
        };
        debug!(
            "round {} level {}: {} deciding ({} attempts)",
            view.round, view.level, player.name, attempts
        );
        Some(f(self.policy.as_mut(), &view))
    }

    fn respond_to_dare(&mut self) {
        let Some(response) = self.consult(self.dare_attempts, |policy, view| policy.on_dare(view))
        else {
            self.violation("round without an active player");
            self.store.next_phase();
            return;
        };
        match response {
            Response::Accept => {
                self.act(ActionKind::AcceptDare, |store| {
                    store.accept_dare();
                    None
                });
            }
            Response::Skip => {
                self.dare_attempts += 1;
                self.act(ActionKind::SkipDare, GameStore::skip_dare);
            }
        }
    }

    fn respond_to_punishment(&mut self) {
        let Some(response) = self.consult(self.punishment_attempts, |policy, view| {
            policy.on_punishment(view)
        }) else {
            self.violation("punishment without an active player");
            self.store.next_phase();
            return;
        };
        match response {
            Response::Accept => {
                self.act(ActionKind::AcceptPunishment, |store| {
                    store.accept_punishment();
                    None
                });
            }
            Response::Skip => {
                self.punishment_attempts += 1;
                self.act(ActionKind::SkipPunishment, GameStore::skip_punishment);
            }
        }
    }

    fn judge_proof(&mut self) {
        let valid = self
            .consult(0, |policy, view| policy.judge_proof(view))
            .unwrap_or(false);
        if valid {
            self.act(ActionKind::ProofValid, |store| {
                store.mark_proof_valid();
                None
            });
        } else {
            self.act(ActionKind::ProofInvalid, |store| {
                store.mark_proof_invalid();
                None
            });
        }
    }

    fn advance(&mut self) {
        let snapshot = self.snapshot();
        let from = self.store.phase();
        let to = self.store.next_phase();
        if to == Phase::Event
            && from != Phase::Event
            && let Some(snapshot) = snapshot
        {
            self.push_record(snapshot, ActionKind::Event, None);
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        let player = self.store.active_player()?;
        Some(Snapshot {
            player: player.id,
            daring: player.daring_level.get(),
            round: self.store.current_round(),
            streak_before: player.stats.skip_streak,
            points_before: player.stats.points,
        })
    }

    fn act(
        &mut self,
        action: ActionKind,
        apply: impl FnOnce(&mut GameStore) -> Option<SkipRollResult>,
    ) {
        let Some(snapshot) = self.snapshot() else {
            self.violation(&format!("{action:?} without an active player"));
            return;
        };
        let result = apply(&mut self.store);
        self.push_record(snapshot, action, result);
    }

    fn push_record(
        &mut self,
        snapshot: Snapshot,
        action: ActionKind,
        result: Option<SkipRollResult>,
    ) {
        let points_after = self
            .store
            .data()
            .player(snapshot.player)
            .map_or(snapshot.points_before, |p| p.stats.points);
        let record = ActionRecord {
            round: snapshot.round,
            player: snapshot.player,
            daring: snapshot.daring,
            action,
            streak_before: snapshot.streak_before,
            result,
            points_delta: points_after - snapshot.points_before,
            phase_after: self.store.phase(),
        };
        debug!(
            "{} {:?} -> {:?} ({:+}) now {}",
            record.player, record.action, record.result, record.points_delta, record.phase_after
        );
        self.actions.push(record);
    }

    fn check_invariants(&mut self) {
        let data = self.store.data();
        let mut found = Vec::new();
        if data.current_round > data.total_rounds {
            found.push(format!(
                "round {} beyond total {}",
                data.current_round, data.total_rounds
            ));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&data.current_dare_level) {
            found.push(format!("dare level {} out of range", data.current_dare_level));
        }
        if matches!(data.phase, Phase::Round | Phase::Punishment | Phase::Proof)
            && data.active_player().is_none()
        {
            found.push(format!("{} without an active player", data.phase));
        }
        if data.phase == Phase::Summary
            && (data.latest_dare.is_some() || data.latest_event.is_some())
        {
            found.push("summary kept a dare or event on screen".to_string());
        }
        for player in &data.players {
            let stats = &player.stats;
            if stats.skip_streak > stats.skips {
                found.push(format!(
                    "{} streak {} exceeds skips {}",
                    player.name, stats.skip_streak, stats.skips
                ));
            }
            if stats.punishments > stats.skips {
                found.push(format!(
                    "{} punishments {} exceed skips {}",
                    player.name, stats.punishments, stats.skips
                ));
            }
        }
        for message in found {
            self.violation(&message);
        }
    }

    fn violation(&mut self, message: &str) {
        let entry = format!("step {}: {message}", self.steps);
        warn!("{entry}");
        if self.violations.len() < MAX_RECORDED_VIOLATIONS {
            self.violations.push(entry);
        }
    }

    fn finish(self, started: bool, total_rounds: u32) -> SimulationSummary {
        let reached_summary = self.store.phase() == Phase::Summary;
        if started && !reached_summary {
            warn!(
                "seed {}: step cap {} hit in {}",
                self.config.seed,
                self.config.max_steps,
                self.store.phase()
            );
        }
        let forced_streak = self.store.config().forced_punishment_streak;
        let final_state = self.store.into_data();
        let standings = game_summary(&final_state.players);
        let digest = state_digest(&final_state);
        info!(
            "seed {} ({}): {} rounds, {} actions, digest {digest:016x}",
            self.config.seed,
            self.config.strategy,
            final_state.current_round,
            self.actions.len()
        );
        SimulationSummary {
            rounds_played: final_state.current_round,
            config: self.config,
            started,
            reached_summary,
            steps: self.steps,
            total_rounds,
            forced_streak,
            actions: self.actions,
            picks: self.picks,
            violations: self.violations,
            standings,
            final_state,
            digest,
        }
    }
}

/// xxHash64 of the serialized match state.
#[must_use]
pub fn state_digest(state: &GameData) -> u64 {
    serde_json::to_vec(state).map_or(0, |bytes| XxHash64::oneshot(DIGEST_SEED, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: SimulationConfig) -> SimulationSummary {
        SimulationSession::new(config).unwrap().run()
    }

    #[test]
    fn daredevil_plays_every_round() {
        let summary = run(SimulationConfig::new(GameplayStrategy::Daredevil, 7).with_rounds(4));
        assert!(summary.started);
        assert!(summary.reached_summary);
        assert_eq!(summary.rounds_played, 4);
        assert_eq!(summary.picks.len(), 4);
        assert_eq!(summary.count(ActionKind::AcceptDare), 4);
        assert_eq!(summary.count(ActionKind::ProofValid), 4);
        assert_eq!(summary.count(ActionKind::SkipDare), 0);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert_eq!(summary.standings.len(), 3);
    }

    #[test]
    fn same_seed_same_digest() {
        let config = SimulationConfig::new(GameplayStrategy::Chaotic, 42).with_rounds(8);
        let a = run(config.clone());
        let b = run(config);
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.actions, b.actions);
    }

    #[test]
    fn short_roster_never_starts() {
        let summary = run(SimulationConfig::new(GameplayStrategy::Daredevil, 1).with_players(2));
        assert!(!summary.started);
        assert!(!summary.reached_summary);
        assert!(summary.actions.is_empty());
        assert_eq!(summary.final_state.phase, Phase::Setup);
    }

    #[test]
    fn step_cap_halts_the_loop() {
        let summary = run(
            SimulationConfig::new(GameplayStrategy::Daredevil, 3)
                .with_rounds(10)
                .with_max_steps(5),
        );
        assert!(summary.started);
        assert!(!summary.reached_summary);
        assert_eq!(summary.steps, 5);
    }

    #[test]
    fn config_override_reaches_the_engine() {
        let summary = run(
            SimulationConfig::new(GameplayStrategy::Daredevil, 9)
                .with_rounds(3)
                .with_config_json(Some(r#"{ "random_event_probability": 1.0 }"#.to_string())),
        );
        assert_eq!(summary.count(ActionKind::Event), 2);
    }

    #[test]
    fn broken_override_is_an_error() {
        let config = SimulationConfig::new(GameplayStrategy::Daredevil, 9)
            .with_config_json(Some("{".to_string()));
        assert!(SimulationSession::new(config).is_err());
    }
}
