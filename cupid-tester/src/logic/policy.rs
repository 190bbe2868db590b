use std::fmt;

use cupid_game::Player;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// What the policy sees when the active player has to decide.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub player: &'a Player,
    pub round: u32,
    pub level: u8,
    /// Skip attempts already made in the current phase of this turn.
    pub attempts: u32,
}

/// Answer to a dare or a punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Response {
    Accept,
    Skip,
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Take or dodge the dare on screen.
    fn on_dare(&mut self, view: &TurnView<'_>) -> Response;

    /// Take or dodge the punishment on screen.
    fn on_punishment(&mut self, view: &TurnView<'_>) -> Response;

    /// Whether the group accepts the submitted proof.
    fn judge_proof(&mut self, view: &TurnView<'_>) -> bool;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameplayStrategy {
    Daredevil,
    Coward,
    Balanced,
    Chaotic,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Daredevil, Self::Coward, Self::Balanced, Self::Chaotic];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daredevil => "Daredevil",
            Self::Coward => "Coward",
            Self::Balanced => "Balanced",
            Self::Chaotic => "Chaotic",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Daredevil => Box::new(DaredevilPolicy),
            Self::Coward => Box::new(CowardPolicy),
            Self::Balanced => Box::new(BalancedPolicy::new(seed)),
            Self::Chaotic => Box::new(ChaoticPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const COWARD_PUNISHMENT_ATTEMPTS: u32 = 2;
const BALANCED_SKIP_CHANCE: f64 = 0.4;
const BALANCED_PROOF_CHANCE: f64 = 0.75;
const CHAOTIC_PUNISHMENT_ATTEMPTS: u32 = 3;

struct DaredevilPolicy;
struct CowardPolicy;

struct BalancedPolicy {
    rng: ChaCha20Rng,
}

impl BalancedPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct ChaoticPolicy {
    rng: ChaCha20Rng,
}

impl ChaoticPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0xC4A0_5C4A_05C4_A05C),
        }
    }

    fn coin(&mut self) -> Response {
        if self.rng.gen_bool(0.5) {
            Response::Skip
        } else {
            Response::Accept
        }
    }
}

impl PlayerPolicy for DaredevilPolicy {
    fn name(&self) -> &'static str {
        "Daredevil"
    }

    fn on_dare(&mut self, _view: &TurnView<'_>) -> Response {
        Response::Accept
    }

    fn on_punishment(&mut self, _view: &TurnView<'_>) -> Response {
        Response::Accept
    }

    fn judge_proof(&mut self, _view: &TurnView<'_>) -> bool {
        true
    }
}

impl PlayerPolicy for CowardPolicy {
    fn name(&self) -> &'static str {
        "Coward"
    }

    fn on_dare(&mut self, _view: &TurnView<'_>) -> Response {
        Response::Skip
    }

    // A caught punishment skip stays in the punishment phase, so the coward
    // eventually gives in.
    fn on_punishment(&mut self, view: &TurnView<'_>) -> Response {
        if view.attempts < COWARD_PUNISHMENT_ATTEMPTS {
            Response::Skip
        } else {
            Response::Accept
        }
    }

    fn judge_proof(&mut self, _view: &TurnView<'_>) -> bool {
        false
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn on_dare(&mut self, view: &TurnView<'_>) -> Response {
        if view.player.stats.skip_streak < 2 && self.rng.gen_bool(BALANCED_SKIP_CHANCE) {
            Response::Skip
        } else {
            Response::Accept
        }
    }

    fn on_punishment(&mut self, _view: &TurnView<'_>) -> Response {
        Response::Accept
    }

    fn judge_proof(&mut self, _view: &TurnView<'_>) -> bool {
        self.rng.gen_bool(BALANCED_PROOF_CHANCE)
    }
}

impl PlayerPolicy for ChaoticPolicy {
    fn name(&self) -> &'static str {
        "Chaotic"
    }

    fn on_dare(&mut self, _view: &TurnView<'_>) -> Response {
        self.coin()
    }

    fn on_punishment(&mut self, view: &TurnView<'_>) -> Response {
        if view.attempts >= CHAOTIC_PUNISHMENT_ATTEMPTS {
            return Response::Accept;
        }
        self.coin()
    }

    fn judge_proof(&mut self, _view: &TurnView<'_>) -> bool {
        self.rng.gen_bool(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cupid_game::{NewPlayer, PlayerId};

    fn view(player: &Player, attempts: u32) -> TurnView<'_> {
        TurnView {
            player,
            round: 1,
            level: 1,
            attempts,
        }
    }

    #[test]
    fn fixed_policies_answer_consistently() {
        let player = Player::new(PlayerId(1), NewPlayer::new("Aria", 2, "", "victim-1"));
        let mut daredevil = GameplayStrategy::Daredevil.create_policy(1);
        assert_eq!(daredevil.on_dare(&view(&player, 0)), Response::Accept);
        assert!(daredevil.judge_proof(&view(&player, 0)));

        let mut coward = GameplayStrategy::Coward.create_policy(1);
        assert_eq!(coward.on_dare(&view(&player, 7)), Response::Skip);
        assert_eq!(coward.on_punishment(&view(&player, 0)), Response::Skip);
        assert_eq!(coward.on_punishment(&view(&player, 2)), Response::Accept);
    }

    #[test]
    fn seeded_policies_replay() {
        let player = Player::new(PlayerId(1), NewPlayer::new("Aria", 2, "", "victim-1"));
        for strategy in [GameplayStrategy::Balanced, GameplayStrategy::Chaotic] {
            let mut a = strategy.create_policy(99);
            let mut b = strategy.create_policy(99);
            for _ in 0..32 {
                assert_eq!(a.on_dare(&view(&player, 0)), b.on_dare(&view(&player, 0)));
                assert_eq!(a.judge_proof(&view(&player, 0)), b.judge_proof(&view(&player, 0)));
            }
        }
    }

    #[test]
    fn balanced_stops_skipping_on_a_streak() {
        let mut player = Player::new(PlayerId(1), NewPlayer::new("Aria", 2, "", "victim-1"));
        player.stats.skip_streak = 2;
        let mut balanced = GameplayStrategy::Balanced.create_policy(5);
        for _ in 0..32 {
            assert_eq!(balanced.on_dare(&view(&player, 0)), Response::Accept);
        }
    }

    #[test]
    fn chaotic_gives_in_after_repeated_attempts() {
        let player = Player::new(PlayerId(1), NewPlayer::new("Aria", 2, "", "victim-1"));
        let mut chaotic = GameplayStrategy::Chaotic.create_policy(5);
        assert_eq!(chaotic.on_punishment(&view(&player, 3)), Response::Accept);
        assert_eq!(GameplayStrategy::Chaotic.to_string(), "Chaotic");
    }
}
