//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use odyssey_config::ConfigError;
use odyssey_core::{CoreError, ValidationErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the CodeOdyssey API")]
    #[diagnostic(
        code(odyssey::connection_failed),
        help(
            "Check that the backend is running and the URL is right.\n\
             Reason: {reason}\n\
             Try: odyssey --api-url http://localhost:8080/api/ courses list"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(odyssey::timeout),
        help("Increase the timeout with --timeout or check the backend.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("You are not logged in")]
    #[diagnostic(code(odyssey::not_logged_in), help("Run: odyssey login"))]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(odyssey::auth_failed),
        help("Check your email and password, then run: odyssey login")
    )]
    AuthFailed { message: String },

    #[error("Access denied: {message}")]
    #[diagnostic(code(odyssey::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(odyssey::not_found),
        help("Run: odyssey courses list to see available courses")
    )]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(odyssey::conflict), help("Field: {field}"))]
    Conflict { field: String, message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(odyssey::validation))]
    Validation { field: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(odyssey::api_error))]
    ApiError { code: String, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(odyssey::config),
        help(
            "Fix the file or recreate it with: odyssey config init\n\
             Expected at: {path}"
        )
    )]
    Config { message: String, path: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(
        code(odyssey::prompt),
        help("Pass the value as a flag when running non-interactively.")
    )]
    Prompt(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::Prompt(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

fn from_field_errors(errors: &ValidationErrors) -> CliError {
    let field = errors.iter().map(|(f, _)| f).collect::<Vec<_>>().join(", ");
    CliError::Validation {
        field,
        reason: errors.iter().map(|(_, m)| m).collect::<Vec<_>>().join("; "),
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Unauthorized { message } => CliError::AuthFailed { message },
            CoreError::Forbidden { message } => CliError::Forbidden { message },
            CoreError::Validation(ref errors) => from_field_errors(errors),
            CoreError::Rejected { message } => CliError::Validation {
                field: "request".into(),
                reason: message,
            },
            CoreError::Conflict { field, message } => CliError::Conflict {
                field: field.unwrap_or_else(|| "request".into()),
                message,
            },
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },
            CoreError::Config { message } => CliError::Config {
                message,
                path: odyssey_config::config_path().display().to_string(),
            },
            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: odyssey_config::config_path().display().to_string(),
            },
        }
    }
}
