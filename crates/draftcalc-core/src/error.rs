// Error taxonomy shared by every engine operation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("player {player_id} has already been drafted")]
    AlreadyDrafted { player_id: String },

    #[error("turn mismatch: expected {expected}, got {actual}")]
    Conflict { expected: String, actual: String },

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl DraftError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DraftError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn player_not_found(id: &str) -> Self {
        DraftError::NotFound {
            entity: "player",
            id: id.to_string(),
        }
    }

    pub(crate) fn team_not_found(team_id: u32) -> Self {
        DraftError::NotFound {
            entity: "team",
            id: team_id.to_string(),
        }
    }

    /// Stable machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::Validation { .. } => "validation",
            DraftError::NotFound { .. } => "not_found",
            DraftError::AlreadyDrafted { .. } => "already_drafted",
            DraftError::Conflict { .. } => "conflict",
            DraftError::InvalidState(_) => "invalid_state",
        }
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
