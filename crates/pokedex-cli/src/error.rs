//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text. Domain validation failures (duplicate team name, full roster)
//! are notices with a conflict exit code, not stack traces.

use miette::Diagnostic;
use thiserror::Error;

use pokedex_core::CoreError;

/// Exit codes per the CLI conventions.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the catalog API")]
    #[diagnostic(
        code(pokedex::connection_failed),
        help(
            "Check your network connection and the API base URL.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pokedex::not_found),
        help("Run: pokedex {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(pokedex::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(pokedex::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pokedex::validation))]
    Validation { field: String, reason: String },

    // ── Local store ──────────────────────────────────────────────────

    #[error("Local cache error: {message}")]
    #[diagnostic(
        code(pokedex::storage),
        help("Check permissions on the data directory, or pass --data-dir.")
    )]
    StorageFailed { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(pokedex::config))]
    Config(#[from] pokedex_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(pokedex::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(pokedex::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::Config(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api {
                message,
                status: None,
            } => CliError::ConnectionFailed { reason: message },

            CoreError::Api {
                message,
                status: Some(status),
            } => CliError::ApiError {
                message: format!("HTTP {status}: {message}"),
            },

            CoreError::NotFound { identifier } => CliError::NotFound {
                resource_type: "record".into(),
                identifier,
                list_command: "pokemon list".into(),
            },

            CoreError::TeamNotFound { identifier } => CliError::NotFound {
                resource_type: "team".into(),
                identifier,
                list_command: "teams list".into(),
            },

            CoreError::UnknownFacet { facet, name } => CliError::Validation {
                field: facet.into(),
                reason: format!("'{name}' is not in the {facet} catalog"),
            },

            CoreError::EmptyTeamName => CliError::Validation {
                field: "name".into(),
                reason: "team name must not be empty".into(),
            },

            conflict @ (CoreError::DuplicateTeamName { .. }
            | CoreError::TeamFull { .. }
            | CoreError::DuplicateTeamMember { .. }) => CliError::Conflict {
                message: conflict.to_string(),
            },

            CoreError::Storage(e) => CliError::StorageFailed {
                message: e.to_string(),
            },

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}
