// Configuration loading and parsing (league.toml, server.toml).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use draftcalc_core::error::DraftError;
use draftcalc_core::league::{LeagueConfiguration, LeagueType, LeagueUpdate};
use draftcalc_core::player::Position;
use draftcalc_core::scoring::ScoringUpdate;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfiguration,
    pub ws_port: u16,
    /// Player rankings file; the built-in list is used when `None`.
    pub players_csv: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    num_teams: i64,
    draft_position: i64,
    #[serde(default = "default_snake")]
    snake_draft: bool,
    #[serde(default)]
    league_type: Option<String>,
    /// Position abbreviation -> required count.
    roster: HashMap<String, i32>,
    #[serde(default)]
    scoring: Option<ScoringUpdate>,
}

fn default_snake() -> bool {
    true
}

// ---------------------------------------------------------------------------
// server.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ServerFile {
    server: ServerSection,
    #[serde(default)]
    data: DataSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataSection {
    players_csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/server.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = build_league(league_file.league)?;

    // --- server.toml (required) ---
    let server_path = config_dir.join("server.toml");
    let server_text = read_file(&server_path)?;
    let server_file: ServerFile =
        toml::from_str(&server_text).map_err(|e| ConfigError::ParseError {
            path: server_path.clone(),
            source: e,
        })?;

    if server_file.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    let players_csv = server_file
        .data
        .players_csv
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let path = PathBuf::from(p);
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        });

    Ok(Config {
        league,
        ws_port: server_file.server.port,
        players_csv,
    })
}

/// Turn the raw `[league]` table into a validated configuration.
///
/// Range checks are the engine's own, so a file and a live settings change
/// are held to the same rules. A `league_type` sets the reception value of
/// that preset; `[league.scoring]` then overrides individual multipliers.
fn build_league(section: LeagueSection) -> Result<LeagueConfiguration, ConfigError> {
    let mut roster = BTreeMap::new();
    for (key, count) in &section.roster {
        let pos = Position::from_str_pos(key).ok_or_else(|| ConfigError::ValidationError {
            field: format!("league.roster.{key}"),
            message: "unknown position (expected QB, RB, WR, TE, K or DST)".into(),
        })?;
        roster.insert(pos, *count);
    }

    let mut league = LeagueConfiguration::create(
        section.num_teams,
        section.draft_position,
        section.snake_draft,
        roster,
    )
    .map_err(league_error)?;

    if let Some(name) = &section.league_type {
        let league_type =
            LeagueType::from_name(name).ok_or_else(|| ConfigError::ValidationError {
                field: "league.league_type".into(),
                message: format!("unknown league type '{name}'"),
            })?;
        league
            .update(&LeagueUpdate {
                league_type: Some(league_type),
                scoring: Some(ScoringUpdate {
                    receptions: Some(league_type.preset().receptions),
                    ..ScoringUpdate::default()
                }),
                ..LeagueUpdate::default()
            })
            .map_err(league_error)?;
    }

    if let Some(scoring) = section.scoring {
        league
            .update(&LeagueUpdate {
                scoring: Some(scoring),
                ..LeagueUpdate::default()
            })
            .map_err(league_error)?;
    }

    Ok(league)
}

fn league_error(err: DraftError) -> ConfigError {
    match err {
        DraftError::Validation { field, message } => ConfigError::ValidationError {
            field: format!("league.{field}"),
            message,
        },
        other => ConfigError::ValidationError {
            field: "league".into(),
            message: other.to_string(),
        },
    }
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the server directory or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited config.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, seeding missing
/// files from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SERVER_TOML: &str = "[server]\nport = 9100\n";

    /// Fresh `<tmp>/<name>/config` directory; returns the base dir.
    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(base: &Path, league: &str, server: &str) {
        fs::write(base.join("config/league.toml"), league).unwrap();
        fs::write(base.join("config/server.toml"), server).unwrap();
    }

    fn league_toml(body: &str) -> String {
        format!(
            "[league]\n{body}\n\n[league.roster]\nQB = 1\nRB = 2\nWR = 2\nTE = 1\nK = 1\nDST = 1\n"
        )
    }

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    /// The crate directory, which holds defaults/ (cargo runs tests there).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/draftcalc-server/defaults").exists() {
            cwd.join("crates/draftcalc-server")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    #[test]
    fn shipped_defaults_load() {
        let tmp = std::env::temp_dir().join("draftcalc_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        let root = project_root();
        for name in ["league.toml", "server.toml"] {
            fs::copy(root.join("defaults").join(name), tmp.join("defaults").join(name)).unwrap();
        }

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied.len(), 2);

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.league.number_of_teams(), 12);
        assert_eq!(config.league.draft_position(), 1);
        assert!(config.league.snake_draft());
        assert_eq!(config.league.league_type(), LeagueType::Ppr);
        assert_eq!(config.league.required(Position::RB), 2);
        assert_eq!(config.ws_port, 9001);
        assert_eq!(config.players_csv, Some(tmp.join("data/players.csv")));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_does_not_overwrite_existing() {
        let tmp = scratch("draftcalc_config_no_overwrite");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/server.toml"), "[server]\nport = 1\n").unwrap();
        fs::write(tmp.join("defaults/notes.toml.example"), "").unwrap();
        fs::write(tmp.join("config/server.toml"), SERVER_TOML).unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/server.toml")).unwrap(),
            SERVER_TOML
        );
        assert!(!tmp.join("config/notes.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_errors_without_any_directory() {
        let tmp = std::env::temp_dir().join("draftcalc_config_empty_dir");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_league_file() {
        let tmp = scratch("draftcalc_config_missing_league");
        fs::write(tmp.join("config/server.toml"), SERVER_TOML).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = scratch("draftcalc_config_parse_error");
        write_config(&tmp, "[league\nnum_teams = ", SERVER_TOML);
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_team_count_out_of_range() {
        let tmp = scratch("draftcalc_config_teams_range");
        write_config(
            &tmp,
            &league_toml("num_teams = 6\ndraft_position = 1"),
            SERVER_TOML,
        );
        assert_eq!(field_of(load_config_from(&tmp).unwrap_err()), "league.number_of_teams");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_draft_position_past_last_team() {
        let tmp = scratch("draftcalc_config_position_range");
        write_config(
            &tmp,
            &league_toml("num_teams = 10\ndraft_position = 11"),
            SERVER_TOML,
        );
        assert_eq!(field_of(load_config_from(&tmp).unwrap_err()), "league.draft_position");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_roster_position() {
        let tmp = scratch("draftcalc_config_bad_position");
        let league = "[league]\nnum_teams = 10\ndraft_position = 1\n\n[league.roster]\nLB = 2\n";
        write_config(&tmp, league, SERVER_TOML);
        assert_eq!(field_of(load_config_from(&tmp).unwrap_err()), "league.roster.LB");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_league_type() {
        let tmp = scratch("draftcalc_config_bad_type");
        write_config(
            &tmp,
            &league_toml("num_teams = 10\ndraft_position = 1\nleague_type = \"Guillotine\""),
            SERVER_TOML,
        );
        assert_eq!(field_of(load_config_from(&tmp).unwrap_err()), "league.league_type");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_port_zero() {
        let tmp = scratch("draftcalc_config_port_zero");
        write_config(
            &tmp,
            &league_toml("num_teams = 10\ndraft_position = 1"),
            "[server]\nport = 0\n",
        );
        assert_eq!(field_of(load_config_from(&tmp).unwrap_err()), "server.port");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn league_type_then_scoring_overrides() {
        let tmp = scratch("draftcalc_config_scoring");
        let league = "[league]\nnum_teams = 14\ndraft_position = 7\nsnake_draft = false\n\
                      league_type = \"Half PPR\"\n\n[league.roster]\nqb = 2\n\"D/ST\" = 1\n\n\
                      [league.scoring]\npassing_touchdowns = 6.0\n";
        write_config(&tmp, league, SERVER_TOML);

        let config = load_config_from(&tmp).unwrap();
        let league = &config.league;
        assert_eq!(league.number_of_teams(), 14);
        assert!(!league.snake_draft());
        assert_eq!(league.league_type(), LeagueType::HalfPpr);
        assert_eq!(league.scoring().receptions, 0.5);
        assert_eq!(league.scoring().passing_touchdowns, 6.0);
        assert_eq!(league.required(Position::QB), 2);
        assert_eq!(league.required(Position::DST), 1);
        assert_eq!(league.required(Position::RB), 0);
        assert_eq!(config.players_csv, None);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn absolute_players_path_kept() {
        let tmp = scratch("draftcalc_config_abs_csv");
        write_config(
            &tmp,
            &league_toml("num_teams = 8\ndraft_position = 8"),
            "[server]\nport = 9001\n\n[data]\nplayers_csv = \"/srv/rankings.csv\"\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.players_csv, Some(PathBuf::from("/srv/rankings.csv")));
        let _ = fs::remove_dir_all(&tmp);
    }
}
