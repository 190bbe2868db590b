use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use cupid_game::constants::{
    PUNISHMENT_SKIP_PENALTY_MULT, SCORE_DARE_SUCCESS, SCORE_EVENT, SCORE_FAIL, SCORE_PUNISHMENT,
};
use cupid_game::numbers::round_half_up_to_i32;
use cupid_game::{Award, DaringLevel, PlayerId, SkipRollResult, safe_skip_penalty};

use super::TestScenario;
use crate::logic::simulation::{ActionKind, ActionRecord, SimulationSession, SimulationSummary};
use crate::logic::{GameplayStrategy, SimulationPlan};

const CEILING_CONFIG: &str = r#"{ "punishment_skip_ceiling": true }"#;
const ALWAYS_EVENT_CONFIG: &str = r#"{ "random_event_probability": 1.0 }"#;

pub fn smoke() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        "Three daredevils play a short match to the summary",
        SimulationPlan::new(GameplayStrategy::Daredevil)
            .with_rounds(3)
            .with_expectation(completes_match)
            .with_expectation(|summary: &SimulationSummary| {
                for row in &summary.standings {
                    ensure!(row.points >= 0, "{} ended on {} pts", row.name, row.points);
                }
                Ok(())
            }),
    )
}

pub fn full_game() -> TestScenario {
    TestScenario::simulation(
        "Full Game",
        "Balanced players finish a full match that replays identically",
        SimulationPlan::new(GameplayStrategy::Balanced)
            .with_players(4)
            .with_rounds(8)
            .with_expectation(completes_match)
            .with_expectation(summary_has_a_favorite)
            .with_expectation(replays_identically),
    )
}

pub fn skip_ceiling() -> TestScenario {
    TestScenario::simulation(
        "Skip Ceiling",
        "Cowards hit the forced-punishment streak and are always caught",
        SimulationPlan::new(GameplayStrategy::Coward)
            .with_rounds(10)
            .with_config_json(CEILING_CONFIG)
            .with_expectation(completes_match)
            .with_expectation(ceiling_forces_punishment),
    )
}

pub fn roulette_fairness() -> TestScenario {
    TestScenario::simulation(
        "Roulette Fairness",
        "The roulette spreads turns across the roster and damps repeats",
        SimulationPlan::new(GameplayStrategy::Daredevil)
            .with_players(5)
            .with_rounds(15)
            .with_expectation(completes_match)
            .with_expectation(roulette_spreads_turns),
    )
}

pub fn scoring_invariants() -> TestScenario {
    TestScenario::simulation(
        "Scoring Invariants",
        "Every points change matches the scoring table for chaotic play",
        SimulationPlan::new(GameplayStrategy::Chaotic)
            .with_players(4)
            .with_rounds(12)
            .with_expectation(completes_match)
            .with_expectation(deltas_match_scoring_table),
    )
}

pub fn event_injection() -> TestScenario {
    TestScenario::simulation(
        "Event Injection",
        "Forced random events fire after every non-final turn",
        SimulationPlan::new(GameplayStrategy::Daredevil)
            .with_rounds(6)
            .with_config_json(ALWAYS_EVENT_CONFIG)
            .with_expectation(completes_match)
            .with_expectation(events_follow_every_turn),
    )
}

fn completes_match(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.started, "match never started");
    ensure!(
        summary.reached_summary,
        "match stalled in {} after {} steps",
        summary.final_state.phase,
        summary.steps
    );
    ensure!(
        summary.rounds_played == summary.total_rounds,
        "played {} of {} rounds",
        summary.rounds_played,
        summary.total_rounds
    );
    ensure!(
        summary.picks.len() == summary.rounds_played as usize,
        "{} roulette picks for {} rounds",
        summary.picks.len(),
        summary.rounds_played
    );
    ensure!(
        summary.standings.len() == summary.final_state.players.len(),
        "summary rows do not match the roster"
    );
    Ok(())
}

fn summary_has_a_favorite(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary
            .standings
            .iter()
            .any(|row| row.awards.contains(&Award::CupidsFavorite)),
        "nobody was crowned {}",
        Award::CupidsFavorite
    );
    Ok(())
}

fn replays_identically(summary: &SimulationSummary) -> Result<()> {
    let replay = SimulationSession::new(summary.config.clone())?.run();
    ensure!(
        replay.digest == summary.digest,
        "replay digest {:016x} differs from {:016x}",
        replay.digest,
        summary.digest
    );
    Ok(())
}

fn ceiling_forces_punishment(summary: &SimulationSummary) -> Result<()> {
    let at_ceiling = summary.actions.iter().filter(|record| {
        matches!(record.action, ActionKind::SkipDare | ActionKind::SkipPunishment)
            && record.streak_before >= summary.forced_streak
    });
    for record in at_ceiling {
        ensure!(
            record.result == Some(SkipRollResult::Punishment),
            "round {}: {} skipped at streak {} and got {:?}",
            record.round,
            record.player,
            record.streak_before,
            record.result
        );
    }
    Ok(())
}

fn roulette_spreads_turns(summary: &SimulationSummary) -> Result<()> {
    let roster: Vec<PlayerId> = summary.final_state.players.iter().map(|p| p.id).collect();
    for id in &summary.picks {
        ensure!(roster.contains(id), "roulette picked unknown {id}");
    }
    let most = summary.pick_counts().into_values().max().unwrap_or(0);
    ensure!(
        most * 3 <= summary.picks.len() * 2,
        "one player took {most} of {} turns",
        summary.picks.len()
    );
    let repeats = summary.repeat_picks();
    ensure!(
        repeats * 2 < summary.picks.len(),
        "{repeats} back-to-back repeats in {} picks",
        summary.picks.len()
    );
    Ok(())
}

/// Points change a recorded action should have produced. `None` for a skip
/// that never resolved.
fn expected_delta(record: &ActionRecord) -> Option<i32> {
    let multiplier = DaringLevel::new(record.daring).multiplier();
    let scaled = |base: f64| round_half_up_to_i32(base * multiplier);
    let delta = match record.action {
        ActionKind::AcceptDare | ActionKind::AcceptPunishment => 0,
        ActionKind::ProofValid => scaled(SCORE_DARE_SUCCESS),
        ActionKind::ProofInvalid => scaled(SCORE_FAIL),
        ActionKind::Event => scaled(SCORE_EVENT),
        ActionKind::SkipDare | ActionKind::SkipPunishment => match record.result? {
            SkipRollResult::Safe => scaled(safe_skip_penalty(record.streak_before)),
            SkipRollResult::Punishment if record.action == ActionKind::SkipPunishment => {
                scaled(SCORE_PUNISHMENT * PUNISHMENT_SKIP_PENALTY_MULT)
            }
            SkipRollResult::Punishment => scaled(SCORE_PUNISHMENT),
            SkipRollResult::WorseDare => 0,
        },
    };
    Some(delta)
}

fn deltas_match_scoring_table(summary: &SimulationSummary) -> Result<()> {
    let mut totals: BTreeMap<PlayerId, i32> = BTreeMap::new();
    for record in &summary.actions {
        let expected = expected_delta(record);
        ensure!(
            expected == Some(record.points_delta),
            "round {}: {:?} by {} gave {:+}, expected {:?}",
            record.round,
            record.action,
            record.player,
            record.points_delta,
            expected
        );
        *totals.entry(record.player).or_insert(0) += record.points_delta;
    }
    for player in &summary.final_state.players {
        let total = totals.get(&player.id).copied().unwrap_or(0);
        ensure!(
            total == player.stats.points,
            "{} holds {} pts but actions sum to {total}",
            player.name,
            player.stats.points
        );
    }
    Ok(())
}

fn events_follow_every_turn(summary: &SimulationSummary) -> Result<()> {
    let events = summary.count(ActionKind::Event);
    let expected = summary.rounds_played.saturating_sub(1) as usize;
    ensure!(
        events == expected,
        "{events} events over {} rounds",
        summary.rounds_played
    );
    let credited: u32 = summary
        .final_state
        .players
        .iter()
        .map(|p| p.stats.events_triggered)
        .sum();
    ensure!(
        credited as usize == events,
        "players credited with {credited} events, saw {events}"
    );
    ensure!(
        summary.final_state.latest_event.is_none(),
        "event text left on the summary screen"
    );
    Ok(())
}
