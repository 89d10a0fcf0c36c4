// ── Session slice ──
//
// Who is logged in and whether that question has been answered yet.
// The only way into `Authenticated` is `SessionAction::SetUser`.

use serde::Serialize;
use strum::Display;

use crate::model::{User, UserPatch};

/// Resolution state of the session.
///
/// Starts `Pending` until the startup token check finishes, so a guard
/// can tell "not logged in" apart from "don't know yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Pending,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// An auth request is in flight.
    BeginAuth,
    /// Authentication succeeded.
    SetUser(User),
    /// Authentication failed with a displayable message.
    AuthFailed(String),
    /// Logout or rejected token.
    ClearUser,
    /// Merge locally edited fields into the current user.
    UpdateUser(UserPatch),
    ClearError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    user: Option<User>,
    status: AuthStatus,
    loading: bool,
    error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    /// `true` exactly when a user is present.
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// `false` while the startup check is still running.
    pub fn is_resolved(&self) -> bool {
        self.status != AuthStatus::Pending
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reduce(&mut self, action: SessionAction) {
        match action {
            SessionAction::BeginAuth => {
                self.loading = true;
                self.error = None;
            }
            SessionAction::SetUser(user) => {
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
                self.loading = false;
                self.error = None;
            }
            SessionAction::AuthFailed(message) => {
                self.loading = false;
                self.error = Some(message);
                // A failed attempt answers the startup question but never
                // logs out an existing user.
                if self.status == AuthStatus::Pending {
                    self.status = AuthStatus::Unauthenticated;
                }
            }
            SessionAction::ClearUser => {
                *self = Self {
                    status: AuthStatus::Unauthenticated,
                    ..Self::default()
                };
            }
            SessionAction::UpdateUser(patch) => {
                if let Some(user) = self.user.as_mut() {
                    user.apply(patch);
                }
            }
            SessionAction::ClearError => self.error = None,
        }
    }
}
