use colored::Colorize;
use cupid_game::{SkipRollResult, encode_party_code};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, PlanOverrides, SimulationPlan};
use crate::logic::simulation::{ActionKind, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    pub runs: Vec<RunRecord>,
}

/// One played match, flattened for CSV and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub scenario_name: String,
    pub seed: u64,
    pub party_code: String,
    pub strategy: String,
    pub players: usize,
    pub rounds_played: u32,
    pub total_rounds: u32,
    pub steps: usize,
    pub dares_accepted: usize,
    pub safe_skips: usize,
    pub punishments: usize,
    pub worse_dares: usize,
    pub events: usize,
    pub winner: String,
    pub top_points: i32,
    pub digest: String,
    pub passed: bool,
}

impl RunRecord {
    #[must_use]
    pub fn from_summary(scenario_name: &str, summary: &SimulationSummary, passed: bool) -> Self {
        Self {
            scenario_name: scenario_name.to_string(),
            seed: summary.seed(),
            party_code: encode_party_code(summary.seed()),
            strategy: summary.strategy().label().to_string(),
            players: summary.final_state.players.len(),
            rounds_played: summary.rounds_played,
            total_rounds: summary.total_rounds,
            steps: summary.steps,
            dares_accepted: summary.count(ActionKind::AcceptDare),
            safe_skips: summary.skip_results(SkipRollResult::Safe),
            punishments: summary.skip_results(SkipRollResult::Punishment),
            worse_dares: summary.skip_results(SkipRollResult::WorseDare),
            events: summary.count(ActionKind::Event),
            winner: summary.winner().unwrap_or("-").to_string(),
            top_points: summary
                .standings
                .iter()
                .map(|row| row.points)
                .max()
                .unwrap_or(0),
            digest: format!("{:016x}", summary.digest),
            passed,
        }
    }
}

pub struct LogicTester {
    tester: GameTester,
    overrides: PlanOverrides,
}

impl LogicTester {
    pub const fn new(tester: GameTester, overrides: PlanOverrides) -> Self {
        Self { tester, overrides }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let plan = scenario.plan.clone().with_overrides(self.overrides);
        let mut results = Vec::new();

        for &seed in seeds {
            if self.tester.verbose() {
                println!(
                    "🧪 Testing scenario: {} (strategy: {} seed: {})",
                    scenario.name.bright_white(),
                    plan.strategy,
                    seed
                );
            }

            results.push(self.run_single_scenario(&scenario.name, &plan, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        name: &str,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut runs = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = match self.tester.run_plan(plan, iteration_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    failures.push(format!(
                        "Iteration {} (seed {iteration_seed}): setup failed: {err:#}",
                        i + 1
                    ));
                    continue;
                }
            };

            if let Some(err) = evaluate_expectations(plan, &summary) {
                failures.push(format!(
                    "Iteration {} (strategy {}, seed {}, code {}, rounds {}/{}, steps {}): {} | {}",
                    i + 1,
                    summary.strategy().label(),
                    summary.seed(),
                    encode_party_code(summary.seed()),
                    summary.rounds_played,
                    summary.total_rounds,
                    summary.steps,
                    err,
                    summarize_recent_actions(&summary)
                ));
                if self.tester.verbose() {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.as_str().red()
                    );
                }
                runs.push(RunRecord::from_summary(name, &summary, false));
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.tester.verbose() {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) rounds:{} winner:{}",
                        i + 1,
                        iterations,
                        summary.rounds_played,
                        summary.winner().unwrap_or("-")
                    );
                }
                runs.push(RunRecord::from_summary(name, &summary, true));
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
            runs,
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(violation) = summary.violations.first() {
        return Some(format!("invariant violated: {violation}"));
    }
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(format!("{err:#}"));
        }
    }
    None
}

fn summarize_recent_actions(summary: &SimulationSummary) -> String {
    if summary.actions.is_empty() {
        return "no actions recorded".to_string();
    }

    summary
        .actions
        .iter()
        .rev()
        .take(3)
        .map(|record| {
            let result = record
                .result
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            format!(
                "round {} {}: {:?} -> {} ({:+}) streak {}",
                record.round,
                record.player,
                record.action,
                result,
                record.points_delta,
                record.streak_before
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
