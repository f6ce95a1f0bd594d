// League scoring rules: per-stat multipliers and the defense points-allowed table.

use serde::{Deserialize, Serialize};

/// One row of the points-allowed table: a defense holding opponents to at
/// most `max_allowed` points earns `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsAllowedTier {
    pub max_allowed: u32,
    pub points: f64,
}

/// Fantasy scoring multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub passing_yards: f64,
    pub passing_touchdowns: f64,
    pub interceptions: f64,
    pub rushing_yards: f64,
    pub rushing_touchdowns: f64,
    pub receiving_yards: f64,
    pub receiving_touchdowns: f64,
    pub receptions: f64,
    pub fumbles_lost: f64,
    pub field_goals: f64,
    pub extra_points: f64,
    pub sacks: f64,
    pub interceptions_defense: f64,
    pub fumble_recoveries: f64,
    pub defensive_touchdowns: f64,
    pub safety: f64,
    /// Sorted by `max_allowed` ascending; the first tier that covers the
    /// points allowed wins.
    pub points_allowed: Vec<PointsAllowedTier>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let tier = |max_allowed, points| PointsAllowedTier { max_allowed, points };
        ScoringSettings {
            passing_yards: 0.04,
            passing_touchdowns: 4.0,
            interceptions: -2.0,
            rushing_yards: 0.1,
            rushing_touchdowns: 6.0,
            receiving_yards: 0.1,
            receiving_touchdowns: 6.0,
            receptions: 1.0,
            fumbles_lost: -2.0,
            field_goals: 3.0,
            extra_points: 1.0,
            sacks: 1.0,
            interceptions_defense: 2.0,
            fumble_recoveries: 2.0,
            defensive_touchdowns: 6.0,
            safety: 2.0,
            points_allowed: vec![
                tier(0, 10.0),
                tier(6, 7.0),
                tier(13, 4.0),
                tier(20, 1.0),
                tier(27, 0.0),
                tier(34, -1.0),
                tier(35, -4.0),
            ],
        }
    }
}

/// Partial override of [`ScoringSettings`]; `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringUpdate {
    pub passing_yards: Option<f64>,
    pub passing_touchdowns: Option<f64>,
    pub interceptions: Option<f64>,
    pub rushing_yards: Option<f64>,
    pub rushing_touchdowns: Option<f64>,
    pub receiving_yards: Option<f64>,
    pub receiving_touchdowns: Option<f64>,
    pub receptions: Option<f64>,
    pub fumbles_lost: Option<f64>,
    pub field_goals: Option<f64>,
    pub extra_points: Option<f64>,
    pub sacks: Option<f64>,
    pub interceptions_defense: Option<f64>,
    pub fumble_recoveries: Option<f64>,
    pub defensive_touchdowns: Option<f64>,
    pub safety: Option<f64>,
    pub points_allowed: Option<Vec<PointsAllowedTier>>,
}

/// Raw season (or game) stats for one player. Missing stats count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub passing_yards: f64,
    pub passing_touchdowns: f64,
    pub interceptions: f64,
    pub rushing_yards: f64,
    pub rushing_touchdowns: f64,
    pub receiving_yards: f64,
    pub receiving_touchdowns: f64,
    pub receptions: f64,
    pub fumbles_lost: f64,
    pub field_goals: f64,
    pub extra_points: f64,
    pub sacks: f64,
    pub interceptions_defense: f64,
    pub fumble_recoveries: f64,
    pub defensive_touchdowns: f64,
    pub safety: f64,
    pub points_allowed: Option<u32>,
}

impl ScoringSettings {
    /// Apply every `Some` field of `update`.
    pub fn merged(&self, update: &ScoringUpdate) -> ScoringSettings {
        let mut s = self.clone();
        let pairs: [(&mut f64, Option<f64>); 16] = [
            (&mut s.passing_yards, update.passing_yards),
            (&mut s.passing_touchdowns, update.passing_touchdowns),
            (&mut s.interceptions, update.interceptions),
            (&mut s.rushing_yards, update.rushing_yards),
            (&mut s.rushing_touchdowns, update.rushing_touchdowns),
            (&mut s.receiving_yards, update.receiving_yards),
            (&mut s.receiving_touchdowns, update.receiving_touchdowns),
            (&mut s.receptions, update.receptions),
            (&mut s.fumbles_lost, update.fumbles_lost),
            (&mut s.field_goals, update.field_goals),
            (&mut s.extra_points, update.extra_points),
            (&mut s.sacks, update.sacks),
            (&mut s.interceptions_defense, update.interceptions_defense),
            (&mut s.fumble_recoveries, update.fumble_recoveries),
            (&mut s.defensive_touchdowns, update.defensive_touchdowns),
            (&mut s.safety, update.safety),
        ];
        for (slot, value) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(table) = &update.points_allowed {
            s.points_allowed = table.clone();
        }
        s
    }

    /// Names of multipliers that are not finite numbers.
    pub(crate) fn non_finite_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("passing_yards", self.passing_yards),
            ("passing_touchdowns", self.passing_touchdowns),
            ("interceptions", self.interceptions),
            ("rushing_yards", self.rushing_yards),
            ("rushing_touchdowns", self.rushing_touchdowns),
            ("receiving_yards", self.receiving_yards),
            ("receiving_touchdowns", self.receiving_touchdowns),
            ("receptions", self.receptions),
            ("fumbles_lost", self.fumbles_lost),
            ("field_goals", self.field_goals),
            ("extra_points", self.extra_points),
            ("sacks", self.sacks),
            ("interceptions_defense", self.interceptions_defense),
            ("fumble_recoveries", self.fumble_recoveries),
            ("defensive_touchdowns", self.defensive_touchdowns),
            ("safety", self.safety),
        ];
        let mut bad: Vec<&'static str> = fields
            .iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .collect();
        if self.points_allowed.iter().any(|t| !t.points.is_finite()) {
            bad.push("points_allowed");
        }
        bad
    }

    /// Fantasy points for a stat line, rounded to two decimals.
    pub fn calculate_points(&self, stats: &StatLine) -> f64 {
        let mut points = 0.0;

        points += stats.passing_yards * self.passing_yards;
        points += stats.passing_touchdowns * self.passing_touchdowns;
        points += stats.interceptions * self.interceptions;

        points += stats.rushing_yards * self.rushing_yards;
        points += stats.rushing_touchdowns * self.rushing_touchdowns;

        points += stats.receiving_yards * self.receiving_yards;
        points += stats.receiving_touchdowns * self.receiving_touchdowns;
        points += stats.receptions * self.receptions;

        points += stats.field_goals * self.field_goals;
        points += stats.extra_points * self.extra_points;

        points += stats.sacks * self.sacks;
        points += stats.interceptions_defense * self.interceptions_defense;
        points += stats.fumble_recoveries * self.fumble_recoveries;
        points += stats.defensive_touchdowns * self.defensive_touchdowns;
        points += stats.safety * self.safety;

        if let Some(allowed) = stats.points_allowed {
            let mut table = self.points_allowed.clone();
            table.sort_by_key(|t| t.max_allowed);
            if let Some(tier) = table.iter().find(|t| allowed <= t.max_allowed) {
                points += tier.points;
            }
        }

        points += stats.fumbles_lost * self.fumbles_lost;

        (points * 100.0).round() / 100.0
    }
}
