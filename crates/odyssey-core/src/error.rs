// ── Core error types ──
//
// User-facing errors from odyssey-core. Consumers never see raw HTTP
// statuses; `From<odyssey_api::Error>` folds transport failures into the
// categories the client reacts to.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach the server: {reason}")]
    Network { reason: String },

    #[error("The server did not respond in time")]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    #[error("Access denied: {message}")]
    Forbidden { message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Server refused the payload (HTTP 400 / 422).
    #[error("Rejected by server: {message}")]
    Rejected { message: String },

    /// Conflicting state, optionally attributed to a form field.
    #[error("Conflict: {message}")]
    Conflict {
        field: Option<String>,
        message: String,
    },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout)
    }

    /// Field-level messages for a form, if this error carries any.
    ///
    /// A field-attributed conflict is reported as a one-field map so
    /// callers can render it beside the input.
    pub fn field_errors(&self) -> Option<ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::Conflict {
                field: Some(field),
                message,
            } => Some(ValidationErrors::single(field, message.clone())),
            _ => None,
        }
    }

    /// Attribute a conflict to `field` with a replacement message.
    pub(crate) fn conflict_on(self, field: &str, message: &str) -> Self {
        match self {
            Self::Conflict { .. } => Self::Conflict {
                field: Some(field.to_owned()),
                message: message.to_owned(),
            },
            other => other,
        }
    }

    /// Message suitable for showing to a person.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } | Self::Timeout => {
                "Could not reach the server. Check your connection and try again.".into()
            }
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".into(),
            Self::Conflict { message, .. }
            | Self::Rejected { message }
            | Self::Forbidden { message }
            | Self::NotFound { message } => message.clone(),
            Self::Validation(errors) => errors.to_string(),
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => "Something went wrong. Please try again.".into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<odyssey_api::Error> for CoreError {
    fn from(err: odyssey_api::Error) -> Self {
        match err {
            odyssey_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            odyssey_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            odyssey_api::Error::NotFound { message } => CoreError::NotFound { message },
            odyssey_api::Error::Conflict { message } => CoreError::Conflict {
                field: None,
                message,
            },
            odyssey_api::Error::Validation { message } => CoreError::Rejected { message },
            odyssey_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            odyssey_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.is_request() {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            odyssey_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            odyssey_api::Error::Tls(reason) => CoreError::Network {
                reason: format!("TLS error: {reason}"),
            },
            odyssey_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("Unexpected response from server: {message}"),
                code: None,
                status: None,
            },
            odyssey_api::Error::TokenStore(message) => CoreError::Internal(message),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_map_to_categories() {
        let err: CoreError = odyssey_api::Error::Unauthorized {
            message: "expired".into(),
        }
        .into();
        assert!(err.is_unauthorized());

        let err: CoreError = odyssey_api::Error::Api {
            status: 503,
            message: "down".into(),
            code: None,
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    }

    #[test]
    fn conflict_can_be_attributed_to_field() {
        let err: CoreError = odyssey_api::Error::Conflict {
            message: "duplicate".into(),
        }
        .into();
        let err = err.conflict_on("email", "This email is already in use");

        let fields = err.field_errors().unwrap_or_default();
        assert_eq!(fields.get("email"), Some("This email is already in use"));
    }

    #[test]
    fn conflict_on_ignores_other_errors() {
        let err = CoreError::NotFound {
            message: "x".into(),
        }
        .conflict_on("email", "taken");
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn user_messages() {
        assert!(CoreError::Timeout.user_message().contains("connection"));
        assert_eq!(
            CoreError::NotFound {
                message: "Course not found".into()
            }
            .user_message(),
            "Course not found"
        );
    }
}
