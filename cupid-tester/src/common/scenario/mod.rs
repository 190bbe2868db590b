pub mod catalog;

use crate::logic::SimulationPlan;

/// A named plan the logic tester can run across seeds.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(
        name: impl Into<String>,
        description: &'static str,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            plan,
        }
    }
}

/// Keys accepted by `--scenarios`, in catalog order.
pub const SCENARIO_KEYS: [&str; 6] = [
    "smoke",
    "full-game",
    "skip-ceiling",
    "roulette-fairness",
    "scoring-invariants",
    "event-injection",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(catalog::smoke()),
        "full-game" | "full" => Some(catalog::full_game()),
        "skip-ceiling" | "ceiling" => Some(catalog::skip_ceiling()),
        "roulette-fairness" | "roulette" => Some(catalog::roulette_fairness()),
        "scoring-invariants" | "scoring" => Some(catalog::scoring_invariants()),
        "event-injection" | "events" => Some(catalog::event_injection()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS
        .iter()
        .filter_map(|key| get_scenario(key).map(|scenario| (*key, scenario.description)))
        .collect()
}
