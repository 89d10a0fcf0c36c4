// ── Client state store ──
//
// Three independent slices (session, courses, progress), each held in a
// `watch` channel. All writes go through `Store::dispatch`; readers take
// snapshots or subscribe for change notifications.

pub mod courses;
pub mod keyed;
pub mod progress;
pub mod session;

use tokio::sync::watch;
use tracing::trace;

pub use courses::{CoursesAction, CoursesState};
pub use keyed::{Keyed, KeyedList};
pub use progress::{ProgressAction, ProgressState};
pub use session::{AuthStatus, SessionAction, SessionState};

use crate::stream::StateStream;

/// Any action understood by one of the slices.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Session(SessionAction),
    Courses(CoursesAction),
    Progress(ProgressAction),
}

impl From<SessionAction> for Action {
    fn from(a: SessionAction) -> Self {
        Self::Session(a)
    }
}

impl From<CoursesAction> for Action {
    fn from(a: CoursesAction) -> Self {
        Self::Courses(a)
    }
}

impl From<ProgressAction> for Action {
    fn from(a: ProgressAction) -> Self {
        Self::Progress(a)
    }
}

/// Single source of truth for client state.
///
/// Reducers run synchronously inside `send_modify`, so every dispatch is
/// applied atomically and observed in dispatch order.
pub struct Store {
    session: watch::Sender<SessionState>,
    courses: watch::Sender<CoursesState>,
    progress: watch::Sender<ProgressState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (session, _) = watch::channel(SessionState::new());
        let (courses, _) = watch::channel(CoursesState::default());
        let (progress, _) = watch::channel(ProgressState::default());
        Self {
            session,
            courses,
            progress,
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub fn dispatch(&self, action: impl Into<Action>) {
        match action.into() {
            Action::Session(a) => {
                trace!(action = ?a, "session");
                self.session.send_modify(|s| s.reduce(a));
            }
            Action::Courses(a) => {
                trace!(action = ?a, "courses");
                self.courses.send_modify(|s| s.reduce(a));
            }
            Action::Progress(a) => {
                trace!(action = ?a, "progress");
                self.progress.send_modify(|s| s.reduce(a));
            }
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn courses(&self) -> CoursesState {
        self.courses.borrow().clone()
    }

    pub fn progress(&self) -> ProgressState {
        self.progress.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_session(&self) -> StateStream<SessionState> {
        StateStream::new(self.session.subscribe())
    }

    pub fn subscribe_courses(&self) -> StateStream<CoursesState> {
        StateStream::new(self.courses.subscribe())
    }

    pub fn subscribe_progress(&self) -> StateStream<ProgressState> {
        StateStream::new(self.progress.subscribe())
    }

    /// Wait until the session has left `Pending`, then return it.
    pub async fn session_resolved(&self) -> SessionState {
        let mut rx = self.session.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        match rx.wait_for(SessionState::is_resolved).await {
            Ok(state) => state.clone(),
            Err(_) => self.session(),
        }
    }
}
