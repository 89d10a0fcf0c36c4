// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// and status-code normalization. Endpoint groups (auth, courses, users)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::token::TokenStore;
use crate::transport::TransportConfig;
use crate::types::ErrorBody;

/// How many characters of an unparseable body end up in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Async client for the CodeOdyssey REST API.
///
/// Every request reads the current token from the [`TokenStore`] and sends
/// it as `Authorization: Bearer <token>` when one is present. All methods
/// return typed payloads or a normalized [`Error`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport settings.
    ///
    /// `base_url` is the API root, e.g. `http://localhost:8080/api/`.
    /// A trailing slash is added when missing so relative joins keep the
    /// full path.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, tokens)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The API root URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store shared with the auth service.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Whether a token is currently persisted.
    pub fn has_token(&self) -> Result<bool, Error> {
        Ok(self.tokens.load()?.is_some())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"courses/42/lessons"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let builder = self.authorize(self.http.get(url))?;
        let resp = Self::execute(builder).await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let builder = self.authorize(self.http.post(url).json(body))?;
        let resp = Self::execute(builder).await?;
        Self::decode(resp).await
    }

    /// POST with no request body, discarding whatever the server returns.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let builder = self.authorize(self.http.post(url))?;
        Self::execute(builder).await?;
        Ok(())
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let builder = self.authorize(self.http.put(url).json(body))?;
        let resp = Self::execute(builder).await?;
        Self::decode(resp).await
    }

    /// PUT, discarding the response body.
    pub(crate) async fn put_discard(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let builder = self.authorize(self.http.put(url).json(body))?;
        Self::execute(builder).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send the request and turn any non-success status into an [`Error`].
    async fn execute(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        trace!(%status, "response received");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// Map a non-success status and its body onto an error variant.
///
/// The backend sends `{"message": "..."}` on failures; when that is
/// missing the canonical reason phrase is used instead.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> Error {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let text = preview(body);
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                text
            }
        });

    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized { message },
        StatusCode::FORBIDDEN => Error::Forbidden { message },
        StatusCode::NOT_FOUND => Error::NotFound { message },
        StatusCode::CONFLICT => Error::Conflict { message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Validation { message },
        _ => Error::Api {
            status: status.as_u16(),
            message,
            code: parsed.code,
        },
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            base,
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let c = client("http://localhost:8080/api");
        assert_eq!(c.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            c.url("/courses/7").unwrap().as_str(),
            "http://localhost:8080/api/courses/7"
        );
    }

    #[test]
    fn conflict_status_keeps_server_message() {
        let err = error_for_status(StatusCode::CONFLICT, r#"{"message":"Email already in use"}"#);
        match err {
            Error::Conflict { message } => assert_eq!(message, "Email already in use"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_falls_back_to_reason_phrase() {
        let err = error_for_status(StatusCode::UNAUTHORIZED, "");
        match err {
            Error::Unauthorized { message } => assert_eq!(message, "Unauthorized"),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_carries_code() {
        let err = error_for_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"boom","code":"internal"}"#,
        );
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.api_error_code(), Some("internal"));
    }
}
