// Wire protocol: JSON requests from clients and the responses sent back.
//
// Requests carry a `type` tag (`GET_STATE`, `MAKE_PICK`, ...). Every request
// gets exactly one response: `{"status":"ok","data":...}` or
// `{"status":"error","kind":"...","message":"..."}`.

use draftcalc_core::league::{LeagueConfiguration, LeagueType, LeagueUpdate};
use draftcalc_core::player::Position;
use draftcalc_core::scoring::StatLine;
use draftcalc_core::sources::PlayerInput;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRequest {
    GetState,
    /// `round` and `pick_number` name the turn the client is picking for;
    /// a stale turn is rejected as a conflict.
    MakePick {
        player_id: String,
        team_id: u32,
        round: u32,
        pick_number: u32,
    },
    /// `current_round` defaults to the draft's current round.
    Suggest {
        team_id: u32,
        #[serde(default)]
        current_round: Option<u32>,
    },
    GetBoard,
    GetTeamRoster {
        team_id: u32,
    },
    GetHistory,
    Reset,
    UpdateSettings {
        settings: LeagueUpdate,
    },
    /// Replace every setting; omitted fields take their defaults. The draft
    /// restarts.
    Configure {
        settings: LeagueConfiguration,
    },
    ApplyPreset {
        league_type: LeagueType,
    },
    GetSettings,
    /// Exactly one of `players` or `csv` must be given.
    LoadPlayers {
        #[serde(default)]
        players: Option<Vec<PlayerInput>>,
        #[serde(default)]
        csv: Option<String>,
    },
    GetPlayer {
        player_id: String,
    },
    SearchPlayers {
        query: String,
    },
    PlayersByPosition {
        position: Position,
    },
    CalculatePoints {
        stats: StatLine,
    },
    GetDraftOrder {
        round: u32,
    },
    GetTeamPickInfo {
        team_id: u32,
        round: u32,
    },
    GetLeagueTypes,
}

impl ClientRequest {
    /// Request name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientRequest::GetState => "GET_STATE",
            ClientRequest::MakePick { .. } => "MAKE_PICK",
            ClientRequest::Suggest { .. } => "SUGGEST",
            ClientRequest::GetBoard => "GET_BOARD",
            ClientRequest::GetTeamRoster { .. } => "GET_TEAM_ROSTER",
            ClientRequest::GetHistory => "GET_HISTORY",
            ClientRequest::Reset => "RESET",
            ClientRequest::UpdateSettings { .. } => "UPDATE_SETTINGS",
            ClientRequest::Configure { .. } => "CONFIGURE",
            ClientRequest::ApplyPreset { .. } => "APPLY_PRESET",
            ClientRequest::GetSettings => "GET_SETTINGS",
            ClientRequest::LoadPlayers { .. } => "LOAD_PLAYERS",
            ClientRequest::GetPlayer { .. } => "GET_PLAYER",
            ClientRequest::SearchPlayers { .. } => "SEARCH_PLAYERS",
            ClientRequest::PlayersByPosition { .. } => "PLAYERS_BY_POSITION",
            ClientRequest::CalculatePoints { .. } => "CALCULATE_POINTS",
            ClientRequest::GetDraftOrder { .. } => "GET_DRAFT_ORDER",
            ClientRequest::GetTeamPickInfo { .. } => "GET_TEAM_PICK_INFO",
            ClientRequest::GetLeagueTypes => "GET_LEAGUE_TYPES",
        }
    }
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServerResponse {
    Ok { data: serde_json::Value },
    Error { kind: String, message: String },
}

impl ServerResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        ServerResponse::Ok { data }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        ServerResponse::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Serialize for a text frame.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"status":"error","kind":"internal","message":"failed to encode response: {e}"}}"#)
        })
    }
}
