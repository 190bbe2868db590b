//! Match phases and the phase-to-route contract consumed by navigation.
use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_ROUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Setup,
    Pregame,
    Roulette,
    Round,
    Proof,
    Punishment,
    SafeSkip,
    Event,
    Summary,
}

impl Phase {
    pub const ALL: [Self; 9] = [
        Self::Setup,
        Self::Pregame,
        Self::Roulette,
        Self::Round,
        Self::Proof,
        Self::Punishment,
        Self::SafeSkip,
        Self::Event,
        Self::Summary,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Pregame => "pregame",
            Self::Roulette => "roulette",
            Self::Round => "round",
            Self::Proof => "proof",
            Self::Punishment => "punishment",
            Self::SafeSkip => "safe-skip",
            Self::Event => "event",
            Self::Summary => "summary",
        }
    }

    /// Route the UI navigates to while this phase is active.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Setup => "/",
            Self::Pregame => "/pregame",
            Self::Roulette => "/roulette",
            Self::Round => "/round",
            Self::Proof => "/proof",
            Self::Punishment => "/punishment",
            Self::SafeSkip => "/safe-skip",
            Self::Event => "/event",
            Self::Summary => "/LeaderScreen",
        }
    }

    /// Phases where the current turn has resolved and the match may move on.
    #[must_use]
    pub const fn is_turn_resolution(self) -> bool {
        matches!(self, Self::Proof | Self::Punishment | Self::SafeSkip)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| format!("unknown phase `{s}`"))
    }
}

/// Route for a phase.
#[must_use]
pub const fn route_for_phase(phase: Phase) -> &'static str {
    phase.route()
}

/// Route for a phase given by name, falling back to `/` for unknown names.
#[must_use]
pub fn route_for_phase_name(name: &str) -> &'static str {
    name.parse::<Phase>().map_or(FALLBACK_ROUTE, Phase::route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_has_a_route_and_roundtrips_by_name() {
        for phase in Phase::ALL {
            assert!(phase.route().starts_with('/'));
            assert_eq!(phase.as_str().parse::<Phase>(), Ok(phase));
            assert_eq!(route_for_phase_name(phase.as_str()), phase.route());
        }
    }

    #[test]
    fn summary_routes_to_leader_screen() {
        assert_eq!(route_for_phase(Phase::Summary), "/LeaderScreen");
        assert_eq!(route_for_phase(Phase::SafeSkip), "/safe-skip");
        assert_eq!(route_for_phase(Phase::Setup), "/");
    }

    #[test]
    fn unknown_names_fall_back_to_root() {
        assert_eq!(route_for_phase_name("awards"), "/");
        assert_eq!(route_for_phase_name(""), "/");
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        assert_eq!(
            serde_json::to_string(&Phase::SafeSkip).unwrap(),
            "\"safe-skip\""
        );
        let parsed: Phase = serde_json::from_str("\"roulette\"").unwrap();
        assert_eq!(parsed, Phase::Roulette);
    }

    #[test]
    fn resolution_phases_are_flagged() {
        let resolving: Vec<_> = Phase::ALL
            .into_iter()
            .filter(|p| p.is_turn_resolution())
            .collect();
        assert_eq!(
            resolving,
            vec![Phase::Proof, Phase::Punishment, Phase::SafeSkip]
        );
        assert!(Phase::Summary.is_terminal());
    }
}
