// Player sources: CSV rankings files, client-supplied JSON rows and the
// built-in sample list.
//
// CSV header: Rank,Name,Position,Team,ProjectedPoints,ADP,Tier,ByeWeek with an
// optional Id column. Rows without an Id use their rank as the identifier.
// Range checks (rank, tier, bye week) are left to `PlayerCatalog::load`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::DraftError;
use crate::player::{Player, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error on line {line}: {source}")]
    Csv { line: usize, source: csv::Error },

    #[error("line {line}: unknown position '{value}'")]
    InvalidPosition { line: usize, value: String },

    #[error("player source contained no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    #[serde(default)]
    Id: Option<String>,
    Rank: i32,
    Name: String,
    Position: String,
    #[serde(default)]
    Team: String,
    ProjectedPoints: f64,
    ADP: f64,
    Tier: i32,
    ByeWeek: i32,
}

fn players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();

    for (idx, result) in reader.deserialize::<RawPlayerRow>().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        let raw = result.map_err(|source| SourceError::Csv { line, source })?;
        let position =
            Position::from_str_pos(&raw.Position).ok_or_else(|| SourceError::InvalidPosition {
                line,
                value: raw.Position.clone(),
            })?;
        let id = match raw.Id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => raw.Rank.to_string(),
        };
        players.push(
            Player::new(id, raw.Name.trim(), position, raw.Team.trim())
                .with_rank(raw.Rank)
                .with_points(raw.ProjectedPoints)
                .with_adp(raw.ADP)
                .with_tier(raw.Tier)
                .with_bye_week(raw.ByeWeek),
        );
    }

    if players.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(players)
}

/// Parse players from CSV text.
pub fn parse_players_csv(text: &str) -> Result<Vec<Player>, SourceError> {
    players_from_reader(text.as_bytes())
}

/// Load players from a CSV file.
pub fn load_players_csv(path: &Path) -> Result<Vec<Player>, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = players_from_reader(file)?;
    info!("read {} players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// JSON rows
// ---------------------------------------------------------------------------

/// A player as a client sends it. The position stays a string until
/// [`players_from_input`] checks it, so an unknown position is a validation
/// failure rather than a malformed request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerInput {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub team: String,
    pub rank: i32,
    pub projected_points: f64,
    pub adp: f64,
    pub tier: i32,
    pub bye_week: i32,
}

/// Convert client rows into players. Fails on the first row whose position
/// is not one of the six football positions.
pub fn players_from_input(rows: Vec<PlayerInput>) -> Result<Vec<Player>, DraftError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let position = Position::from_str_pos(&row.position).ok_or_else(|| {
                DraftError::validation(
                    format!("players[{i}].position"),
                    format!("unknown position '{}'", row.position),
                )
            })?;
            Ok(Player::new(row.id, row.name, position, row.team)
                .with_rank(row.rank)
                .with_points(row.projected_points)
                .with_adp(row.adp)
                .with_tier(row.tier)
                .with_bye_week(row.bye_week))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in list
// ---------------------------------------------------------------------------

/// Fifteen well-known players, used when no CSV file is configured.
pub fn default_players() -> Vec<Player> {
    #[rustfmt::skip]
    let rows: [(&str, &str, Position, &str, f64, f64, i32, i32); 15] = [
        ("1", "Patrick Mahomes", Position::QB, "KC", 420.5, 15.2, 1, 10),
        ("2", "Josh Allen", Position::QB, "BUF", 410.3, 18.7, 1, 13),
        ("3", "Jalen Hurts", Position::QB, "PHI", 395.8, 22.1, 1, 10),
        ("4", "Christian McCaffrey", Position::RB, "SF", 380.2, 2.3, 1, 9),
        ("5", "Austin Ekeler", Position::RB, "LAC", 365.7, 8.9, 1, 5),
        ("6", "Saquon Barkley", Position::RB, "NYG", 350.4, 12.4, 1, 13),
        ("7", "Justin Jefferson", Position::WR, "MIN", 330.5, 1.1, 1, 13),
        ("8", "Ja'Marr Chase", Position::WR, "CIN", 325.3, 3.8, 1, 7),
        ("9", "Tyreek Hill", Position::WR, "MIA", 320.7, 5.2, 1, 10),
        ("10", "Travis Kelce", Position::TE, "KC", 305.8, 4.5, 1, 10),
        ("11", "Mark Andrews", Position::TE, "BAL", 280.3, 25.7, 2, 13),
        ("12", "Bijan Robinson", Position::RB, "ATL", 270.5, 6.8, 2, 11),
        ("13", "A.J. Brown", Position::WR, "PHI", 260.7, 13.2, 2, 10),
        ("14", "Joe Burrow", Position::QB, "CIN", 250.2, 45.3, 2, 7),
        ("15", "Tony Pollard", Position::RB, "DAL", 235.3, 28.4, 2, 7),
    ];

    rows.into_iter()
        .map(|(id, name, position, team, points, adp, tier, bye)| {
            let rank = id.parse::<i32>().unwrap_or(1);
            Player::new(id, name, position, team)
                .with_rank(rank)
                .with_points(points)
                .with_adp(adp)
                .with_tier(tier)
                .with_bye_week(bye)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
