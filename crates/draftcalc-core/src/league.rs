// League configuration: team count, draft slot, snake flag, roster
// requirements and scoring, plus league-type presets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DraftError, Result};
use crate::player::Position;
use crate::scoring::{ScoringSettings, ScoringUpdate};

/// Every draft runs this many rounds.
pub const TOTAL_ROUNDS: u32 = 15;

pub const MIN_TEAMS: u32 = 8;
pub const MAX_TEAMS: u32 = 16;

/// Scoring/roster preset families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueType {
    Standard,
    #[serde(rename = "PPR")]
    Ppr,
    #[serde(rename = "HalfPPR")]
    HalfPpr,
    Superflex,
    Dynasty,
}

impl LeagueType {
    pub const ALL: [LeagueType; 5] = [
        LeagueType::Standard,
        LeagueType::Ppr,
        LeagueType::HalfPpr,
        LeagueType::Superflex,
        LeagueType::Dynasty,
    ];

    /// Parse a preset name ("Standard", "PPR", "HalfPPR"/"Half PPR", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "standard" => Some(LeagueType::Standard),
            "ppr" => Some(LeagueType::Ppr),
            "halfppr" => Some(LeagueType::HalfPpr),
            "superflex" => Some(LeagueType::Superflex),
            "dynasty" => Some(LeagueType::Dynasty),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeagueType::Standard => "Standard",
            LeagueType::Ppr => "PPR",
            LeagueType::HalfPpr => "Half PPR",
            LeagueType::Superflex => "Superflex",
            LeagueType::Dynasty => "Dynasty",
        }
    }

    /// Roster requirements and reception value this preset imposes.
    pub fn preset(&self) -> Preset {
        let mut roster = default_roster_requirements();
        let receptions = match self {
            LeagueType::Standard => 0.0,
            LeagueType::Ppr => 1.0,
            LeagueType::HalfPpr => 0.5,
            LeagueType::Superflex => {
                roster.insert(Position::QB, 2);
                1.0
            }
            LeagueType::Dynasty => {
                roster = BTreeMap::from([
                    (Position::QB, 2),
                    (Position::RB, 4),
                    (Position::WR, 6),
                    (Position::TE, 2),
                    (Position::K, 1),
                    (Position::DST, 1),
                ]);
                1.0
            }
        };
        Preset {
            roster_requirements: roster,
            receptions,
        }
    }
}

impl fmt::Display for LeagueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The full override a league-type preset applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub roster_requirements: BTreeMap<Position, i32>,
    pub receptions: f64,
}

/// QB 1, RB 2, WR 2, TE 1, K 1, DST 1.
pub fn default_roster_requirements() -> BTreeMap<Position, i32> {
    BTreeMap::from([
        (Position::QB, 1),
        (Position::RB, 2),
        (Position::WR, 2),
        (Position::TE, 1),
        (Position::K, 1),
        (Position::DST, 1),
    ])
}

/// League settings.
///
/// Values built through [`LeagueConfiguration::create`] or `merged` are
/// validated. A deserialized configuration is not: missing fields take their
/// defaults and [`DraftEngine::configure`](crate::engine::DraftEngine::configure)
/// validates it before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfiguration {
    number_of_teams: u32,
    draft_position: u32,
    snake_draft: bool,
    roster_requirements: BTreeMap<Position, i32>,
    league_type: LeagueType,
    scoring: ScoringSettings,
}

/// A partial settings change. `None` leaves the field as it is; roster
/// requirements merge per position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueUpdate {
    pub number_of_teams: Option<i64>,
    pub draft_position: Option<i64>,
    pub snake_draft: Option<bool>,
    pub roster_requirements: Option<BTreeMap<Position, i32>>,
    pub league_type: Option<LeagueType>,
    pub scoring: Option<ScoringUpdate>,
}

/// Where a team picks in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamPickInfo {
    pub round: u32,
    /// 1-based slot within the round.
    pub pick_position: u32,
    pub pick_number: u32,
    pub is_user_pick: bool,
}

impl Default for LeagueConfiguration {
    /// 12-team snake PPR league picking first.
    fn default() -> Self {
        LeagueConfiguration {
            number_of_teams: 12,
            draft_position: 1,
            snake_draft: true,
            roster_requirements: default_roster_requirements(),
            league_type: LeagueType::Ppr,
            scoring: ScoringSettings::default(),
        }
    }
}

impl LeagueConfiguration {
    /// Build and validate a configuration with PPR scoring.
    ///
    /// Signed inputs let callers hand over raw user values; anything out of
    /// range is a validation error rather than a silent wrap.
    pub fn create(
        number_of_teams: i64,
        draft_position: i64,
        snake_draft: bool,
        roster_requirements: BTreeMap<Position, i32>,
    ) -> Result<Self> {
        let number_of_teams = teams_in_range(number_of_teams)?;
        let draft_position = draft_position_in_range(draft_position, number_of_teams)?;
        let config = LeagueConfiguration {
            number_of_teams,
            draft_position,
            snake_draft,
            roster_requirements,
            league_type: LeagueType::Ppr,
            scoring: ScoringSettings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn number_of_teams(&self) -> u32 {
        self.number_of_teams
    }

    pub fn draft_position(&self) -> u32 {
        self.draft_position
    }

    pub fn snake_draft(&self) -> bool {
        self.snake_draft
    }

    pub fn total_rounds(&self) -> u32 {
        TOTAL_ROUNDS
    }

    pub fn total_picks(&self) -> u32 {
        self.number_of_teams * TOTAL_ROUNDS
    }

    pub fn roster_requirements(&self) -> &BTreeMap<Position, i32> {
        &self.roster_requirements
    }

    /// Required count at a position; positions not listed require none.
    pub fn required(&self, position: Position) -> i32 {
        self.roster_requirements.get(&position).copied().unwrap_or(0)
    }

    pub fn league_type(&self) -> LeagueType {
        self.league_type
    }

    pub fn scoring(&self) -> &ScoringSettings {
        &self.scoring
    }

    /// Check every invariant on the whole configuration.
    pub fn validate(&self) -> Result<()> {
        teams_in_range(self.number_of_teams as i64)?;
        draft_position_in_range(self.draft_position as i64, self.number_of_teams)?;
        for (pos, &count) in &self.roster_requirements {
            if count < 0 {
                return Err(DraftError::validation(
                    format!("roster_requirements.{pos}"),
                    format!("must be non-negative, got {count}"),
                ));
            }
        }
        if let Some(field) = self.scoring.non_finite_fields().first() {
            return Err(DraftError::validation(
                format!("scoring.{field}"),
                "must be a finite number",
            ));
        }
        Ok(())
    }

    /// Apply a partial change to `self`.
    ///
    /// The merged result is validated as a whole before it replaces the
    /// current settings; on any error nothing changes.
    pub fn update(&mut self, update: &LeagueUpdate) -> Result<()> {
        let next = self.merged(update)?;
        info!(
            "League settings updated: {} teams, pick {}, snake={}, type={}",
            next.number_of_teams, next.draft_position, next.snake_draft, next.league_type
        );
        *self = next;
        Ok(())
    }

    /// The configuration that `update` would produce, without changing `self`.
    pub fn merged(&self, update: &LeagueUpdate) -> Result<LeagueConfiguration> {
        let mut next = self.clone();
        if let Some(n) = update.number_of_teams {
            next.number_of_teams = teams_in_range(n)?;
        }
        if let Some(p) = update.draft_position {
            next.draft_position = u32::try_from(p).map_err(|_| {
                DraftError::validation("draft_position", format!("must be positive, got {p}"))
            })?;
        }
        if let Some(snake) = update.snake_draft {
            next.snake_draft = snake;
        }
        if let Some(roster) = &update.roster_requirements {
            for (&pos, &count) in roster {
                next.roster_requirements.insert(pos, count);
            }
        }
        if let Some(league_type) = update.league_type {
            next.league_type = league_type;
        }
        if let Some(scoring) = &update.scoring {
            next.scoring = next.scoring.merged(scoring);
        }
        next.validate()?;
        Ok(next)
    }

    /// A copy of `self` with a league-type preset applied: the preset's
    /// full roster requirements and reception value replace the current ones.
    pub fn with_preset(&self, league_type: LeagueType) -> LeagueConfiguration {
        let preset = league_type.preset();
        let mut next = self.clone();
        next.roster_requirements = preset.roster_requirements;
        next.scoring.receptions = preset.receptions;
        next.league_type = league_type;
        next
    }

    /// Team ids in pick order for `round` (1-based).
    pub fn draft_order(&self, round: u32) -> Vec<u32> {
        draft_order(round, self.number_of_teams, self.snake_draft)
    }

    /// When `team_id` picks in `round`, or `None` for an unknown team.
    pub fn team_pick_info(&self, team_id: u32, round: u32) -> Option<TeamPickInfo> {
        let order = self.draft_order(round);
        let idx = order.iter().position(|&t| t == team_id)?;
        let pick_position = idx as u32 + 1;
        Some(TeamPickInfo {
            round,
            pick_position,
            pick_number: (round.saturating_sub(1)) * self.number_of_teams + pick_position,
            is_user_pick: team_id == self.draft_position,
        })
    }
}

/// Team ids in pick order for a round: ascending in odd rounds, descending in
/// even rounds of a snake draft.
pub fn draft_order(round: u32, number_of_teams: u32, snake_draft: bool) -> Vec<u32> {
    if snake_draft && round % 2 == 0 {
        (1..=number_of_teams).rev().collect()
    } else {
        (1..=number_of_teams).collect()
    }
}

fn teams_in_range(n: i64) -> Result<u32> {
    if !(MIN_TEAMS as i64..=MAX_TEAMS as i64).contains(&n) {
        return Err(DraftError::validation(
            "number_of_teams",
            format!("must be between {MIN_TEAMS} and {MAX_TEAMS}, got {n}"),
        ));
    }
    Ok(n as u32)
}

fn draft_position_in_range(p: i64, number_of_teams: u32) -> Result<u32> {
    if !(1..=number_of_teams as i64).contains(&p) {
        return Err(DraftError::validation(
            "draft_position",
            format!("must be between 1 and {number_of_teams}, got {p}"),
        ));
    }
    Ok(p as u32)
}
