//! Dare and punishment actions, including the skip roll and its escalation.
use log::debug;

use super::GameStore;
use crate::constants::{
    FALLBACK_PUNISHMENT, FALLBACK_WORSE_DARE, FALLBACK_WORSE_PUNISHMENT,
    MAX_LEVEL, PUNISHMENT_SKIP_PENALTY_MULT, SCORE_DARE_SUCCESS, SCORE_FAIL, SCORE_PUNISHMENT,
    SKIP_FURY_STREAK,
};
use crate::phase::Phase;
use crate::rng::{RandomSource, RollStream};
use crate::scoring::{
    SkipRollResult, apply_score, calculate_skip_chances, final_level, round_level,
    safe_skip_penalty,
};

fn safe_dare_skip_text(name: &str, streak: u32) -> String {
    match streak {
        1 => format!("{name} dodged Cupid's arrow... for now. 😅"),
        2 => format!("{name} slips away again. Cupid is getting annoyed... 😒"),
        _ => format!("{name} escapes once more. Cupid's patience is wearing thin! 😠"),
    }
}

fn safe_punishment_skip_text(name: &str, streak: u32) -> String {
    match streak {
        1 => format!("{name} narrowly escaped punishment... Cupid's eye twitches. 😅"),
        2 => format!("{name} slips away from punishment. Cupid's patience wears thin... 😒"),
        _ => format!("{name} dodges punishment again. Cupid is SEETHING! 😠"),
    }
}

impl<R: RandomSource> GameStore<R> {
    /// The active player takes the dare and moves on to proof.
    ///
    /// Returns `false`, leaving the state untouched, when nobody is on trial
    /// or the match is over.
    pub fn accept_dare(&mut self) -> bool {
        if !self.turn_open("accept_dare") {
            return false;
        }
        let Some(player) = self.data.active_player() else {
            return false;
        };
        let outcome = format!("{} rose to the challenge! Share the proof.", player.name);
        self.data.latest_outcome = Some(outcome);
        self.data.phase = Phase::Proof;
        debug!("dare accepted; phase -> {}", self.data.phase);
        true
    }

    /// The active player tries to dodge the current dare.
    ///
    /// At the forced-punishment streak the roll is skipped and the player is
    /// punished outright. Otherwise the roll lands on a safe skip, a
    /// punishment, or a harder dare that keeps the round going. Returns
    /// `None` when there is no active player or the match is over.
    pub fn skip_dare(&mut self) -> Option<SkipRollResult> {
        if !self.turn_open("skip_dare") {
            return None;
        }
        let Self {
            data,
            prompts,
            config,
            rng,
        } = self;
        let current_round = data.current_round;
        let current_level = data.current_dare_level;
        let player = data.active_player_mut()?;
        let streak = player.stats.skip_streak;

        if streak >= config.forced_punishment_streak {
            let level = final_level(player, round_level(current_round));
            let detail = prompts.punishments.pick(level, rng, FALLBACK_PUNISHMENT);
            apply_score(player, SCORE_PUNISHMENT);
            player.stats.record_punished_skip();
            debug!("{} hit the skip ceiling at streak {streak}", player.name);
            data.latest_outcome = Some(format!(
                "Cupid.exe is WRATHFUL! Forced punishment! 😈\n\n{detail}"
            ));
            data.phase = Phase::Punishment;
            data.skip_roll_result = Some(SkipRollResult::Punishment);
            return Some(SkipRollResult::Punishment);
        }

        let chances = calculate_skip_chances(streak);
        let result = chances.classify_unit(rng.next_unit(RollStream::SkipRoll));
        debug!("{} skip roll at streak {streak}: {result}", player.name);

        match result {
            SkipRollResult::Safe => {
                apply_score(player, safe_skip_penalty(streak));
                player.stats.record_skip();
                let outcome = safe_dare_skip_text(&player.name, player.stats.skip_streak);
                data.latest_outcome = Some(outcome);
                data.phase = Phase::SafeSkip;
            }
            SkipRollResult::Punishment => {
                let level = final_level(player, round_level(current_round));
                let detail = prompts.punishments.pick(level, rng, FALLBACK_PUNISHMENT);
                apply_score(player, SCORE_PUNISHMENT);
                player.stats.record_punished_skip();
                let outcome = if player.stats.skip_streak >= SKIP_FURY_STREAK {
                    format!("Cupid.exe is FURIOUS! 😈\n\n{detail}")
                } else {
                    detail
                };
                data.latest_outcome = Some(outcome);
                data.phase = Phase::Punishment;
            }
            SkipRollResult::WorseDare => {
                let level = current_level.saturating_add(1).min(MAX_LEVEL);
                let dare = prompts.dares.pick(level, rng, FALLBACK_WORSE_DARE);
                player.stats.record_skip();
                let outcome = if player.stats.skip_streak >= SKIP_FURY_STREAK {
                    "Cupid doubles down! 🔥🔥\n\nYou tried to run, but love finds a way..."
                } else {
                    "Cupid won't let you escape that easily! 🔥"
                };
                data.latest_outcome = Some(outcome.to_string());
                data.latest_dare = Some(dare);
                data.current_dare_level = level;
            }
        }
        data.skip_roll_result = Some(result);
        Some(result)
    }

    /// The active player takes the punishment and moves on to proof.
    ///
    /// Same guards as [`Self::accept_dare`].
    pub fn accept_punishment(&mut self) -> bool {
        if !self.turn_open("accept_punishment") {
            return false;
        }
        let Some(player) = self.data.active_player() else {
            return false;
        };
        let outcome = format!("{} accepted the punishment! Share the proof.", player.name);
        self.data.latest_outcome = Some(outcome);
        self.data.phase = Phase::Proof;
        debug!("punishment accepted; phase -> {}", self.data.phase);
        true
    }

    /// The active player tries to dodge a punishment.
    ///
    /// Same three-way roll as [`Self::skip_dare`], with a heavier penalty
    /// when caught and a harsher punishment instead of a harder dare. When
    /// `punishment_skip_ceiling` is enabled, a player at the
    /// forced-punishment streak is always caught.
    pub fn skip_punishment(&mut self) -> Option<SkipRollResult> {
        if !self.turn_open("skip_punishment") {
            return None;
        }
        let Self {
            data,
            prompts,
            config,
            rng,
        } = self;
        let current_round = data.current_round;
        let current_level = data.current_dare_level;
        let player = data.active_player_mut()?;
        let streak = player.stats.skip_streak;

        let result = if config.punishment_skip_ceiling && streak >= config.forced_punishment_streak
        {
            debug!("{} hit the punishment skip ceiling at streak {streak}", player.name);
            SkipRollResult::Punishment
        } else {
            calculate_skip_chances(streak).classify_unit(rng.next_unit(RollStream::SkipRoll))
        };
        debug!("{} punishment skip roll at streak {streak}: {result}", player.name);

        match result {
            SkipRollResult::Safe => {
                apply_score(player, safe_skip_penalty(streak));
                player.stats.record_skip();
                let outcome = safe_punishment_skip_text(&player.name, player.stats.skip_streak);
                data.latest_outcome = Some(outcome);
                data.phase = Phase::SafeSkip;
            }
            SkipRollResult::Punishment => {
                let level = final_level(player, round_level(current_round));
                let detail = prompts
                    .punishments
                    .pick(level, rng, FALLBACK_WORSE_PUNISHMENT);
                apply_score(player, SCORE_PUNISHMENT * PUNISHMENT_SKIP_PENALTY_MULT);
                player.stats.record_punished_skip();
                let outcome = if player.stats.skip_streak >= SKIP_FURY_STREAK {
                    format!(
                        "Cupid.exe is ABSOLUTELY LIVID! 😈🔥\n\nYou think you can escape ME?!\n\n{detail}"
                    )
                } else {
                    format!("Cupid catches you! The punishment just got WORSE!\n\n{detail}")
                };
                data.latest_outcome = Some(outcome);
                data.phase = Phase::Punishment;
            }
            SkipRollResult::WorseDare => {
                let level = current_level.saturating_add(1).min(MAX_LEVEL);
                let punishment = prompts
                    .punishments
                    .pick(level, rng, FALLBACK_WORSE_PUNISHMENT);
                player.stats.record_punished_skip();
                let outcome = if player.stats.skip_streak >= SKIP_FURY_STREAK {
                    format!("Cupid.exe EXPLODES with rage! 🔥💀🔥\n\nYou've gone TOO FAR!\n\n{punishment}")
                } else {
                    format!("Cupid INTENSIFIES the punishment! 🔥\n\n{punishment}")
                };
                data.latest_outcome = Some(outcome);
                data.latest_dare = Some(punishment);
                data.current_dare_level = level;
            }
        }
        data.skip_roll_result = Some(result);
        Some(result)
    }

    /// The group accepts the proof. Awards success points and clears the
    /// skip streak. Returns the points awarded, or `None` without an active
    /// player or once the match is over. Does not change phase.
    pub fn mark_proof_valid(&mut self) -> Option<i32> {
        if !self.turn_open("mark_proof_valid") {
            return None;
        }
        let player = self.data.active_player_mut()?;
        let delta = apply_score(player, SCORE_DARE_SUCCESS);
        player.stats.record_success();
        let outcome = format!(
            "{} completed the dare! Cupid is impressed! 💘 (+{delta} pts)",
            player.name
        );
        debug!("{} proof valid ({delta:+})", player.name);
        self.data.latest_outcome = Some(outcome);
        Some(delta)
    }

    /// The group rejects the proof. Applies the failure penalty; the skip
    /// streak is left as it was.
    pub fn mark_proof_invalid(&mut self) -> Option<i32> {
        if !self.turn_open("mark_proof_invalid") {
            return None;
        }
        let player = self.data.active_player_mut()?;
        let delta = apply_score(player, SCORE_FAIL);
        player.stats.record_failure();
        let outcome = format!(
            "{} couldn't prove it... Cupid is disappointed. 😔 ({delta} pts)",
            player.name
        );
        debug!("{} proof invalid ({delta:+})", player.name);
        self.data.latest_outcome = Some(outcome);
        Some(delta)
    }
}
