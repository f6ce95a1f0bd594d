// Player records and football positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Football positions a player can be drafted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

impl Position {
    /// Every position in display order.
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DST,
    ];

    /// Parse a position abbreviation. Case-insensitive; "D/ST" and "DEF" are
    /// accepted as team defense.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" => Some(Position::K),
            "DST" | "D/ST" | "DEF" => Some(Position::DST),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DST => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

fn available_by_default() -> bool {
    true
}

/// A draftable player.
///
/// Everything except availability is fixed at catalog load. Availability is
/// owned by [`PlayerCatalog`](crate::catalog::PlayerCatalog), which is the
/// only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier within the catalog.
    pub id: String,
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation (e.g. "KC").
    pub team: String,
    /// Overall rank, 1 is best.
    pub rank: i32,
    /// Projected season fantasy points.
    pub projected_points: f64,
    /// Average draft position, in overall pick units.
    pub adp: f64,
    /// Quality tier, 1 is best.
    pub tier: i32,
    pub bye_week: i32,
    #[serde(default = "available_by_default")]
    is_available: bool,
}

impl Player {
    /// Create an available player with neutral numbers; chain the `with_*`
    /// setters to fill in rankings and projections.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        team: impl Into<String>,
    ) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            team: team.into(),
            rank: 1,
            projected_points: 0.0,
            adp: 0.0,
            tier: 1,
            bye_week: 0,
            is_available: true,
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_points(mut self, projected_points: f64) -> Self {
        self.projected_points = projected_points;
        self
    }

    pub fn with_adp(mut self, adp: f64) -> Self {
        self.adp = adp;
        self
    }

    pub fn with_tier(mut self, tier: i32) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_bye_week(mut self, bye_week: i32) -> Self {
        self.bye_week = bye_week;
        self
    }

    /// Whether the player can still be drafted.
    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.is_available = available;
    }
}
