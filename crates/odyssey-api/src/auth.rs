// Authentication endpoints
//
// Login and registration return `{ token, user }`; the token is written to
// the client's token store before the response is handed back. This is the
// only place the token is ever written or removed.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, UserProfileResponse};

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// `POST auth/login` with `{ email, password }`. On success the returned
    /// token is persisted and used for every subsequent request.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        debug!(email, "logging in");
        let resp: AuthResponse = self
            .post(
                "auth/login",
                &LoginRequest {
                    email,
                    password: password.expose_secret(),
                },
            )
            .await?;
        self.persist_token(&resp.token)?;
        debug!(user_id = %resp.user.id, "login successful");
        Ok(resp)
    }

    /// Create an account.
    ///
    /// `POST auth/register` with `{ name, email, password }`. A duplicate
    /// email comes back as [`Error::Conflict`].
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        debug!(email, "registering account");
        let resp: AuthResponse = self
            .post(
                "auth/register",
                &RegisterRequest {
                    name,
                    email,
                    password: password.expose_secret(),
                },
            )
            .await?;
        self.persist_token(&resp.token)?;
        debug!(user_id = %resp.user.id, "registration successful");
        Ok(resp)
    }

    /// Ask the backend who the stored token belongs to.
    ///
    /// Returns `Ok(None)` without a request when no token is stored.
    /// A rejected token surfaces as [`Error::Unauthorized`]; the caller
    /// decides whether to drop it.
    pub async fn current_user(&self) -> Result<Option<UserProfileResponse>, Error> {
        if !self.has_token()? {
            debug!("no stored token, skipping session check");
            return Ok(None);
        }
        self.get_profile().await.map(Some)
    }

    /// End the session by removing the stored token.
    pub fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.tokens().clear()
    }

    fn persist_token(&self, token: &str) -> Result<(), Error> {
        self.tokens().store(&SecretString::from(token.to_owned()))
    }
}
