// Request dispatch: decode a text frame, run it against the shared engine and
// build the response.

use std::sync::{Arc, Mutex};

use draftcalc_core::engine::DraftEngine;
use draftcalc_core::error::DraftError;
use draftcalc_core::sources::{self, SourceError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::protocol::{ClientRequest, ServerResponse};

/// One engine shared by every connection. Holding the lock for a whole
/// request makes each request atomic with respect to the others.
pub type SharedEngine = Arc<Mutex<DraftEngine>>;

pub fn shared(engine: DraftEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("engine lock poisoned")]
    Poisoned,
}

impl HandlerError {
    /// The `kind` field sent to the client.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Draft(e) => e.kind(),
            HandlerError::Source(_) => "validation",
            HandlerError::BadRequest(_) => "bad_request",
            HandlerError::Encode(_) | HandlerError::Poisoned => "internal",
        }
    }
}

impl From<HandlerError> for ServerResponse {
    fn from(err: HandlerError) -> Self {
        ServerResponse::error(err.kind(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Handle one raw text frame. Always produces a response.
pub fn handle_text(engine: &SharedEngine, text: &str) -> ServerResponse {
    let request: ClientRequest = match serde_json::from_str(text) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejected malformed request: {e}");
            return HandlerError::BadRequest(e.to_string()).into();
        }
    };

    let name = request.name();
    let result = match engine.lock() {
        Ok(mut guard) => handle_request(&mut guard, request),
        Err(_) => Err(HandlerError::Poisoned),
    };

    match result {
        Ok(data) => {
            debug!("{name} ok");
            ServerResponse::ok(data)
        }
        Err(e) => {
            debug!("{name} failed: {e}");
            e.into()
        }
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, HandlerError> {
    Ok(serde_json::to_value(value)?)
}

/// Run a decoded request against the engine.
pub fn handle_request(
    engine: &mut DraftEngine,
    request: ClientRequest,
) -> Result<Value, HandlerError> {
    match request {
        ClientRequest::GetState => to_data(engine.state()),

        ClientRequest::MakePick {
            player_id,
            team_id,
            round,
            pick_number,
        } => to_data(engine.make_pick(&player_id, team_id, round, pick_number)?),

        ClientRequest::Suggest {
            team_id,
            current_round,
        } => {
            let round = current_round.unwrap_or(engine.draft_state().current_round);
            to_data(engine.suggest(team_id, round)?)
        }

        ClientRequest::GetBoard => to_data(engine.board()),

        ClientRequest::GetTeamRoster { team_id } => to_data(engine.team_roster(team_id)?),

        ClientRequest::GetHistory => to_data(engine.history()),

        ClientRequest::Reset => {
            engine.reset();
            to_data(engine.state())
        }

        ClientRequest::UpdateSettings { settings } => to_data(engine.update_settings(&settings)?),

        ClientRequest::Configure { settings } => {
            engine.configure(settings)?;
            to_data(engine.state())
        }

        ClientRequest::ApplyPreset { league_type } => to_data(engine.apply_preset(league_type)),

        ClientRequest::GetSettings => to_data(engine.settings()),

        ClientRequest::LoadPlayers { players, csv } => {
            let players = match (players, csv) {
                (Some(rows), None) => sources::players_from_input(rows)?,
                (None, Some(text)) => sources::parse_players_csv(&text)?,
                _ => {
                    return Err(HandlerError::BadRequest(
                        "LOAD_PLAYERS needs exactly one of `players` or `csv`".into(),
                    ))
                }
            };
            engine.load_catalog(players)?;
            info!("Loaded {} players from client", engine.catalog().len());
            to_data(engine.state())
        }

        ClientRequest::GetPlayer { player_id } => to_data(engine.player(&player_id)?),

        ClientRequest::SearchPlayers { query } => to_data(engine.search_players(&query)),

        ClientRequest::PlayersByPosition { position } => {
            to_data(engine.players_by_position(position))
        }

        ClientRequest::CalculatePoints { stats } => to_data(engine.calculate_points(&stats)),

        ClientRequest::GetDraftOrder { round } => to_data(engine.draft_order(round)?),

        ClientRequest::GetTeamPickInfo { team_id, round } => {
            to_data(engine.team_pick_info(team_id, round)?)
        }

        ClientRequest::GetLeagueTypes => to_data(engine.league_types()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
