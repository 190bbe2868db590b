//! End-of-match rankings, delulu scores and award badges.
use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};

const DELULU_MAX: i64 = 100;
const DELULU_PEAK: u8 = 80;
const DELULU_HIGH: u8 = 50;

/// Badge shown next to a player on the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Award {
    CupidsFavorite,
    FearlessHeart,
    PunishmentMagnet,
    MasterOfDrama,
    DeluluRoyalty,
    MostAfraidOfLove,
}

impl Award {
    pub const ALL: [Self; 6] = [
        Self::CupidsFavorite,
        Self::FearlessHeart,
        Self::PunishmentMagnet,
        Self::MasterOfDrama,
        Self::DeluluRoyalty,
        Self::MostAfraidOfLove,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CupidsFavorite => "💘 Cupid's Favorite",
            Self::FearlessHeart => "💖 Fearless Heart",
            Self::PunishmentMagnet => "💀 Punishment Magnet",
            Self::MasterOfDrama => "🎭 Master of Drama",
            Self::DeluluRoyalty => "👑 Delulu Royalty",
            Self::MostAfraidOfLove => "😳 Most Afraid of Love",
        }
    }
}

impl std::fmt::Display for Award {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeluluTier {
    Peak,
    High,
    Dreaming,
}

impl DeluluTier {
    #[must_use]
    pub const fn for_score(score: u8) -> Self {
        if score > DELULU_PEAK {
            Self::Peak
        } else if score > DELULU_HIGH {
            Self::High
        } else {
            Self::Dreaming
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Peak => "Peak delusion achieved 💘",
            Self::High => "High delulu vibes!",
            Self::Dreaming => "Keep dreaming!",
        }
    }
}

/// `daring × (successes − skips) × (events + 1)`, clamped into `[0, 100]`.
#[must_use]
pub fn delulu_score(player: &Player) -> u8 {
    let stats = &player.stats;
    let net = i64::from(stats.successes) - i64::from(stats.skips);
    let raw = i64::from(player.daring_level.get())
        .saturating_mul(net)
        .saturating_mul(i64::from(stats.events_triggered) + 1);
    u8::try_from(raw.clamp(0, DELULU_MAX)).unwrap_or(0)
}

/// One row of the summary screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub points: i32,
    pub delulu_score: u8,
    pub delulu_tier: DeluluTier,
    pub awards: Vec<Award>,
}

/// Players ordered by points, highest first. Ties keep roster order.
#[must_use]
pub fn leaderboard(players: &[Player]) -> Vec<&Player> {
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by(|a, b| b.stats.points.cmp(&a.stats.points));
    ranked
}

/// The top three of the leaderboard.
#[must_use]
pub fn podium(players: &[Player]) -> Vec<&Player> {
    let mut ranked = leaderboard(players);
    ranked.truncate(3);
    ranked
}

fn max_of<T: Ord + Copy>(players: &[Player], key: impl Fn(&Player) -> T) -> Option<T> {
    players.iter().map(key).max()
}

/// Summary rows in roster order. Every player tied for a maximum receives
/// that award.
#[must_use]
pub fn game_summary(players: &[Player]) -> Vec<PlayerSummary> {
    let (
        Some(max_points),
        Some(max_successes),
        Some(max_punishments),
        Some(max_events),
        Some(max_delulu),
        Some(max_skips),
        Some(max_streak),
    ) = (
        max_of(players, |p| p.stats.points),
        max_of(players, |p| p.stats.successes),
        max_of(players, |p| p.stats.punishments),
        max_of(players, |p| p.stats.events_triggered),
        max_of(players, delulu_score),
        max_of(players, |p| p.stats.skips),
        max_of(players, |p| p.stats.skip_streak),
    )
    else {
        return Vec::new();
    };

    players
        .iter()
        .map(|p| {
            let delulu = delulu_score(p);
            let checks = [
                (Award::CupidsFavorite, p.stats.points == max_points),
                (Award::FearlessHeart, p.stats.successes == max_successes),
                (Award::PunishmentMagnet, p.stats.punishments == max_punishments),
                (Award::MasterOfDrama, p.stats.events_triggered == max_events),
                (Award::DeluluRoyalty, delulu == max_delulu),
                (
                    Award::MostAfraidOfLove,
                    p.stats.skips == max_skips || p.stats.skip_streak == max_streak,
                ),
            ];
            PlayerSummary {
                id: p.id,
                name: p.name.clone(),
                points: p.stats.points,
                delulu_score: delulu,
                delulu_tier: DeluluTier::for_score(delulu),
                awards: checks
                    .into_iter()
                    .filter_map(|(award, held)| held.then_some(award))
                    .collect(),
            }
        })
        .collect()
}

/// Single winners for the awards screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineAwards {
    pub most_punished: PlayerId,
    pub fearless_heart: PlayerId,
    pub master_of_drama: PlayerId,
    pub most_afraid: PlayerId,
}

fn first_with_max(players: &[Player], key: impl Fn(&Player) -> u32) -> Option<PlayerId> {
    let max = players.iter().map(&key).max()?;
    players.iter().find(|p| key(p) == max).map(|p| p.id)
}

/// Headline award holders: the first player in roster order at each
/// maximum. `None` for an empty roster.
#[must_use]
pub fn headline_awards(players: &[Player]) -> Option<HeadlineAwards> {
    Some(HeadlineAwards {
        most_punished: first_with_max(players, |p| p.stats.punishments)?,
        fearless_heart: first_with_max(players, |p| p.stats.successes)?,
        master_of_drama: first_with_max(players, |p| p.stats.events_triggered)?,
        most_afraid: first_with_max(players, |p| p.stats.skips)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{NewPlayer, PlayerStats};

    fn player(id: u32, daring: u8, stats: PlayerStats) -> Player {
        let mut p = Player::new(PlayerId(id), NewPlayer::new("P", daring, "", "victim-1"));
        p.stats = stats;
        p
    }

    fn roster() -> Vec<Player> {
        vec![
            player(
                1,
                3,
                PlayerStats {
                    points: 8,
                    successes: 3,
                    events_triggered: 1,
                    ..PlayerStats::default()
                },
            ),
            player(
                2,
                2,
                PlayerStats {
                    points: 8,
                    successes: 1,
                    skips: 4,
                    skip_streak: 2,
                    punishments: 2,
                    ..PlayerStats::default()
                },
            ),
            player(
                3,
                1,
                PlayerStats {
                    points: -3,
                    skips: 1,
                    skip_streak: 1,
                    punishments: 2,
                    events_triggered: 1,
                    ..PlayerStats::default()
                },
            ),
            player(4, 1, PlayerStats::default()),
        ]
    }

    #[test]
    fn delulu_score_clamps() {
        let players = roster();
        assert_eq!(delulu_score(&players[0]), 18);
        assert_eq!(delulu_score(&players[1]), 0);
        let mut huge = players[0].clone();
        huge.stats.successes = 40;
        assert_eq!(delulu_score(&huge), 100);
        assert_eq!(DeluluTier::for_score(100), DeluluTier::Peak);
        assert_eq!(DeluluTier::for_score(51), DeluluTier::High);
        assert_eq!(DeluluTier::for_score(50), DeluluTier::Dreaming);
    }

    #[test]
    fn leaderboard_is_stable_on_ties() {
        let players = roster();
        let ids: Vec<_> = leaderboard(&players).iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
        assert_eq!(podium(&players).len(), 3);
        assert!(podium(&[]).is_empty());
    }

    #[test]
    fn ties_award_every_tied_player() {
        let rows = game_summary(&roster());
        assert!(rows[0].awards.contains(&Award::CupidsFavorite));
        assert!(rows[1].awards.contains(&Award::CupidsFavorite));
        assert!(rows[1].awards.contains(&Award::PunishmentMagnet));
        assert!(rows[2].awards.contains(&Award::PunishmentMagnet));
        assert!(rows[0].awards.contains(&Award::MasterOfDrama));
        assert!(rows[2].awards.contains(&Award::MasterOfDrama));
        assert!(rows[1].awards.contains(&Award::MostAfraidOfLove));
        assert!(!rows[3].awards.contains(&Award::MostAfraidOfLove));
        assert_eq!(rows[0].awards.first(), Some(&Award::CupidsFavorite));
        assert_eq!(rows[0].delulu_tier, DeluluTier::Dreaming);
    }

    #[test]
    fn empty_roster_has_no_summary() {
        assert!(game_summary(&[]).is_empty());
        assert!(headline_awards(&[]).is_none());
    }

    #[test]
    fn headline_awards_pick_first_in_roster_order() {
        let awards = headline_awards(&roster()).unwrap();
        assert_eq!(awards.most_punished, PlayerId(2));
        assert_eq!(awards.fearless_heart, PlayerId(1));
        assert_eq!(awards.master_of_drama, PlayerId(1));
        assert_eq!(awards.most_afraid, PlayerId(2));
    }

    #[test]
    fn award_labels_render() {
        assert_eq!(Award::DeluluRoyalty.to_string(), "👑 Delulu Royalty");
        assert_eq!(Award::ALL.len(), 6);
    }
}
