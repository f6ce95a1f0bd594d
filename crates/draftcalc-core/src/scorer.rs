// Recommendation scoring.
//
// Ranks available players for one team by blending how badly the team needs
// each position with a value signal (projection, ADP versus the current
// round, tier) scaled by positional scarcity. Early rounds lean on need,
// later rounds lean on value.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::league::LeagueConfiguration;
use crate::player::{Player, Position};
use crate::reasoning;
use crate::roster::position_counts;

// ---------------------------------------------------------------------------
// Tuning constants
// ---------------------------------------------------------------------------

pub const NEED_WEIGHT_FLOOR: f64 = 0.3;
pub const NEED_WEIGHT_DECAY_PER_ROUND: f64 = 0.05;
pub const ADP_VALUE_FACTOR: f64 = 0.5;
pub const TIER_MULTIPLIER: f64 = 10.0;
pub const SCARCITY_CAP: f64 = 2.0;
/// Alternatives listed after the optimal pick.
pub const ALTERNATIVE_COUNT: usize = 3;

/// Scaled need per position, all six positions present.
pub type TeamNeeds = BTreeMap<Position, f64>;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The numbers that produced a player's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub need: f64,
    /// Value after the scarcity multiplier.
    pub value: f64,
    pub scarcity: f64,
    pub need_weight: f64,
    pub value_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPlayer {
    pub player: Player,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Every available player scored and sorted best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub players: Vec<ScoredPlayer>,
    pub team_needs: TeamNeeds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    Candidates {
        optimal_pick: ScoredPlayer,
        alternatives: Vec<ScoredPlayer>,
        team_needs: TeamNeeds,
        reasoning: String,
    },
    /// Nobody left to draft. A normal outcome late in a draft.
    NoCandidates { team_needs: TeamNeeds },
}

impl Recommendation {
    pub fn optimal_pick(&self) -> Option<&ScoredPlayer> {
        match self {
            Recommendation::Candidates { optimal_pick, .. } => Some(optimal_pick),
            Recommendation::NoCandidates { .. } => None,
        }
    }

    pub fn team_needs(&self) -> &TeamNeeds {
        match self {
            Recommendation::Candidates { team_needs, .. } => team_needs,
            Recommendation::NoCandidates { team_needs } => team_needs,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring components
// ---------------------------------------------------------------------------

fn available_by_position(available: &[&Player]) -> BTreeMap<Position, usize> {
    let mut counts: BTreeMap<Position, usize> =
        Position::ALL.iter().map(|&pos| (pos, 0)).collect();
    for player in available {
        *counts.entry(player.position).or_insert(0) += 1;
    }
    counts
}

/// Unfilled requirement per position, boosted when few players remain there.
///
/// `available` must be the whole available pool, not a candidate subset.
pub fn team_needs(
    available: &[&Player],
    roster: &[Player],
    league: &LeagueConfiguration,
) -> TeamNeeds {
    let current = position_counts(roster);
    let remaining = available_by_position(available);

    Position::ALL
        .iter()
        .map(|&pos| {
            let have = current.get(&pos).copied().unwrap_or(0) as f64;
            let raw = (league.required(pos) as f64 - have).max(0.0);
            let left = remaining.get(&pos).copied().unwrap_or(0).max(1) as f64;
            (pos, raw * (1.0 + 1.0 / left))
        })
        .collect()
}

/// Multiplier favouring positions with few available players, capped at 2x.
pub fn positional_scarcity(total_available: usize, position_available: usize) -> f64 {
    if total_available == 0 {
        return 1.0;
    }
    (total_available as f64 / position_available.max(1) as f64).min(SCARCITY_CAP)
}

/// Unscaled value: projection, plus half the gap between ADP and the current
/// round, plus ten per tier.
///
/// ADP is in overall-pick units and is compared directly to the round number.
pub fn base_value(player: &Player, current_round: u32) -> f64 {
    let adp_gap = (player.adp - current_round as f64).max(0.0);
    player.projected_points + adp_gap * ADP_VALUE_FACTOR + player.tier as f64 * TIER_MULTIPLIER
}

/// Share of the score given to need in `current_round`; value gets the rest.
pub fn need_weight(current_round: u32) -> f64 {
    (1.0 - current_round as f64 * NEED_WEIGHT_DECAY_PER_ROUND).max(NEED_WEIGHT_FLOOR)
}

fn by_score_then_rank(a: &ScoredPlayer, b: &ScoredPlayer) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.player.rank.cmp(&b.player.rank))
        .then_with(|| a.player.id.cmp(&b.player.id))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Score and sort every available player for a team.
///
/// Pure: reads its inputs and nothing else. Ties on score go to the lower
/// rank, then to the lower identifier.
pub fn rank(
    available: &[&Player],
    roster: &[Player],
    league: &LeagueConfiguration,
    current_round: u32,
) -> Ranking {
    let needs = team_needs(available, roster, league);
    let per_position = available_by_position(available);
    let total_available = available.len();

    let need_w = need_weight(current_round);
    let value_w = 1.0 - need_w;

    let mut players: Vec<ScoredPlayer> = available
        .iter()
        .map(|&player| {
            let scarcity = positional_scarcity(
                total_available,
                per_position.get(&player.position).copied().unwrap_or(0),
            );
            let value = base_value(player, current_round) * scarcity;
            let need = needs.get(&player.position).copied().unwrap_or(0.0);
            ScoredPlayer {
                player: player.clone(),
                score: need * need_w + value * value_w,
                breakdown: ScoreBreakdown {
                    need,
                    value,
                    scarcity,
                    need_weight: need_w,
                    value_weight: value_w,
                },
            }
        })
        .collect();

    players.sort_by(by_score_then_rank);

    Ranking {
        players,
        team_needs: needs,
    }
}

/// Best pick, the next few alternatives, the need map and a short
/// explanation. An empty pool yields [`Recommendation::NoCandidates`].
pub fn recommend(
    available: &[&Player],
    roster: &[Player],
    league: &LeagueConfiguration,
    current_round: u32,
) -> Recommendation {
    let Ranking {
        players,
        team_needs,
    } = rank(available, roster, league, current_round);

    let mut ranked = players.into_iter();
    let Some(optimal_pick) = ranked.next() else {
        return Recommendation::NoCandidates { team_needs };
    };
    let alternatives: Vec<ScoredPlayer> = ranked.take(ALTERNATIVE_COUNT).collect();
    let reasoning = reasoning::explain(&optimal_pick, current_round);

    Recommendation::Candidates {
        optimal_pick,
        alternatives,
        team_needs,
        reasoning,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
