use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{
    DEFAULT_MAX_STEPS, SimulationConfig, SimulationSession, SimulationSummary,
};

/// Roster and round overrides applied to every plan, from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOverrides {
    pub players: Option<usize>,
    pub rounds: Option<u32>,
}

/// What a scenario plays and what it expects afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub players: usize,
    pub rounds: u32,
    pub max_steps: usize,
    pub config_json: Option<String>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            players: 3,
            rounds: 5,
            max_steps: DEFAULT_MAX_STEPS,
            config_json: None,
            expectations: Vec::new(),
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
    pub fn with_config_json(mut self, json: &str) -> Self {
        self.config_json = Some(json.to_string());
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    #[must_use]
    pub const fn with_overrides(mut self, overrides: PlanOverrides) -> Self {
        if let Some(players) = overrides.players {
            self.players = players;
        }
        if let Some(rounds) = overrides.rounds {
            self.rounds = rounds;
        }
        self
    }

    #[must_use]
    pub fn simulation_config(&self, seed: u64) -> SimulationConfig {
        SimulationConfig::new(self.strategy, seed)
            .with_players(self.players)
            .with_rounds(self.rounds)
            .with_max_steps(self.max_steps)
            .with_config_json(self.config_json.clone())
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Headless deterministic runner for the core game logic.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Play one match of `plan` with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot build a store for the plan.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let config = plan.simulation_config(seed);
        if self.verbose {
            println!(
                "🎲 Seed {} | {} | {} players | {} rounds",
                seed,
                plan.strategy.label().bright_white(),
                config.players,
                config.rounds
            );
        }
        let summary = SimulationSession::new(config)?.run();
        if self.verbose {
            let status = if summary.reached_summary {
                "summary".green()
            } else {
                "halted".yellow()
            };
            println!(
                "   ↳ {} after {} steps | winner {}",
                status,
                summary.steps,
                summary.winner().unwrap_or("-")
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_roster_and_rounds() {
        let plan = SimulationPlan::new(GameplayStrategy::Balanced)
            .with_rounds(4)
            .with_overrides(PlanOverrides {
                players: Some(5),
                rounds: None,
            });
        assert_eq!((plan.players, plan.rounds), (5, 4));
        let config = plan.simulation_config(11);
        assert_eq!(config.seed, 11);
        assert_eq!(config.players, 5);
    }

    #[test]
    fn expectations_see_the_summary() {
        let plan = SimulationPlan::new(GameplayStrategy::Daredevil)
            .with_rounds(2)
            .with_expectation(|summary: &SimulationSummary| {
                anyhow::ensure!(summary.rounds_played == 2, "expected two rounds");
                Ok(())
            });
        let summary = GameTester::new(false).run_plan(&plan, 5).unwrap();
        for expectation in &plan.expectations {
            expectation.evaluate(&summary).unwrap();
        }
    }

    #[test]
    fn invalid_override_surfaces_as_error() {
        let plan = SimulationPlan::new(GameplayStrategy::Daredevil).with_config_json("{");
        assert!(GameTester::new(false).run_plan(&plan, 5).is_err());
    }
}
