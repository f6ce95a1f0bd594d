// Read-side roster aggregation: team totals, position counts and roster
// compliance against league requirements.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::player::{Player, Position};

/// Derived statistics for a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub total_points: f64,
    /// Mean tier, 0 for an empty roster.
    pub average_tier: f64,
    pub player_count: usize,
    /// Count for all six positions, zero-filled.
    pub by_position: BTreeMap<Position, usize>,
}

/// Whether a roster meets the league's minimum requirements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterCompliance {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub counts: BTreeMap<Position, usize>,
}

/// Players per position, with every position present.
pub fn position_counts(roster: &[Player]) -> BTreeMap<Position, usize> {
    let mut counts: BTreeMap<Position, usize> =
        Position::ALL.iter().map(|&pos| (pos, 0)).collect();
    for player in roster {
        *counts.entry(player.position).or_insert(0) += 1;
    }
    counts
}

pub fn team_stats(roster: &[Player]) -> TeamStats {
    let total_points = roster.iter().map(|p| p.projected_points).sum();
    let average_tier = if roster.is_empty() {
        0.0
    } else {
        roster.iter().map(|p| p.tier as f64).sum::<f64>() / roster.len() as f64
    };
    TeamStats {
        total_points,
        average_tier,
        player_count: roster.len(),
        by_position: position_counts(roster),
    }
}

/// Compare a roster with per-position minimums.
pub fn compliance(roster: &[Player], requirements: &BTreeMap<Position, i32>) -> RosterCompliance {
    let counts = position_counts(roster);
    let violations: Vec<String> = requirements
        .iter()
        .filter_map(|(pos, &required)| {
            let actual = counts.get(pos).copied().unwrap_or(0) as i64;
            let missing = required as i64 - actual;
            (missing > 0).then(|| format!("Need {missing} more {pos}(s)"))
        })
        .collect();
    RosterCompliance {
        is_valid: violations.is_empty(),
        violations,
        counts,
    }
}
