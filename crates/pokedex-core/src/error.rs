// ── Core error types ──
//
// User-facing errors from pokedex-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<pokedex_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::model::TEAM_CAPACITY;
use crate::storage::StorageError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote catalog ───────────────────────────────────────────────
    #[error("Catalog request failed: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Catalog record not found: {identifier}")]
    NotFound { identifier: String },

    // ── Local store ──────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),

    // ── Filter validation ────────────────────────────────────────────
    #[error("Unknown {facet} '{name}' -- not in the facet catalog")]
    UnknownFacet { facet: &'static str, name: String },

    // ── Team validation ──────────────────────────────────────────────
    #[error("Team name must not be empty")]
    EmptyTeamName,

    #[error("A team named '{name}' already exists")]
    DuplicateTeamName { name: String },

    #[error("Team not found: {identifier}")]
    TeamNotFound { identifier: String },

    #[error("Team '{name}' is full ({TEAM_CAPACITY} pokemon)")]
    TeamFull { name: String },

    #[error("'{pokemon}' is already on team '{team}'")]
    DuplicateTeamMember { team: String, pokemon: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for domain validation failures that should surface to the
    /// user as a notice rather than a hard failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownFacet { .. }
                | Self::EmptyTeamName
                | Self::DuplicateTeamName { .. }
                | Self::TeamFull { .. }
                | Self::DuplicateTeamMember { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pokedex_api::Error> for CoreError {
    fn from(err: pokedex_api::Error) -> Self {
        match err {
            pokedex_api::Error::Api {
                status: 404,
                message,
            } => Self::NotFound {
                identifier: message,
            },
            pokedex_api::Error::Api { status, message } => Self::Api {
                message,
                status: Some(status),
            },
            pokedex_api::Error::Deserialization { message, body: _ } => {
                Self::Internal(format!("deserialization error: {message}"))
            }
            other => Self::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}
