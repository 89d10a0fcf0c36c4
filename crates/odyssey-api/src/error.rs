use thiserror::Error;

/// Top-level error type for the `odyssey-api` crate.
///
/// Every HTTP failure is normalized into one of these variants before it
/// leaves the client. Status codes with a meaning the UI cares about
/// (401, 403, 404, 409, 400/422) get their own variant; everything else
/// lands in [`Error::Api`]. `odyssey-core` maps these into user-facing
/// categories.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// Bearer token missing, expired, or rejected (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated but not allowed (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Request outcome ─────────────────────────────────────────────
    /// Resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Conflicting state on the server, e.g. duplicate email (HTTP 409).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Server-side validation rejected the payload (HTTP 400 / 422).
    #[error("Rejected by server: {message}")]
    Validation { message: String },

    /// Any other non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local state ─────────────────────────────────────────────────
    /// Reading or writing the persisted token failed.
    #[error("Token storage error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Returns `true` if the token is no longer accepted and the session
    /// should be dropped.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a transient transport error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` for HTTP 409.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the API error code, if the server sent one.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_for_classified_variants() {
        let err = Error::Conflict {
            message: "email taken".into(),
        };
        assert_eq!(err.status(), Some(409));
        assert!(err.is_conflict());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
            code: None,
        };
        assert!(err.is_transient());

        let err = Error::Api {
            status: 418,
            message: "teapot".into(),
            code: Some("teapot".into()),
        };
        assert!(!err.is_transient());
        assert_eq!(err.api_error_code(), Some("teapot"));
    }
}
