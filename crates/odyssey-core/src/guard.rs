// ── Route protection ──
//
// Named client routes, the access decision for each, and a minimal
// navigation history that applies those decisions.

use std::fmt;

use serde::Serialize;

use crate::store::{AuthStatus, SessionState};

/// Every screen the client can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Login,
    Register,
    Courses,
    Course { course_id: String },
    Dashboard,
    Lesson { course_id: String, lesson_id: String },
    Profile,
}

impl Route {
    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Lesson { .. } | Self::Profile)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Courses => "/courses".into(),
            Self::Course { course_id } => format!("/courses/{course_id}"),
            Self::Dashboard => "/dashboard".into(),
            Self::Lesson {
                course_id,
                lesson_id,
            } => format!("/courses/{course_id}/lessons/{lesson_id}"),
            Self::Profile => "/profile".into(),
        }
    }

    /// Parse a path produced by [`Route::path`]. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["courses"] => Some(Self::Courses),
            ["courses", id] => Some(Self::Course {
                course_id: (*id).to_owned(),
            }),
            ["courses", course, "lessons", lesson] => Some(Self::Lesson {
                course_id: (*course).to_owned(),
                lesson_id: (*lesson).to_owned(),
            }),
            ["dashboard"] => Some(Self::Dashboard),
            ["profile"] => Some(Self::Profile),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of checking a route against the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Render,
    /// The session is still being resolved; show a placeholder.
    Wait,
    /// Send the user elsewhere. `replace` means the protected entry must
    /// not remain in history.
    Redirect { to: Route, replace: bool },
}

/// Decide whether `route` may be shown for `session`.
pub fn guard(route: &Route, session: &SessionState) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Render;
    }
    match session.status() {
        AuthStatus::Authenticated => GuardDecision::Render,
        AuthStatus::Pending => GuardDecision::Wait,
        AuthStatus::Unauthenticated => GuardDecision::Redirect {
            to: Route::Login,
            replace: true,
        },
    }
}

// ── History ──────────────────────────────────────────────────────────

/// Back-stack of visited routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<Route>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: vec![Route::Home],
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Route {
        static ROOT: Route = Route::Home;
        // `back` never pops the last entry, so this always hits.
        self.entries.last().unwrap_or(&ROOT)
    }

    pub fn entries(&self) -> &[Route] {
        &self.entries
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    pub fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(last) => *last = route,
            None => self.entries.push(route),
        }
    }

    /// Pop one entry. Returns the new current route, or `None` at the root.
    pub fn back(&mut self) -> Option<&Route> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        self.entries.last()
    }

    /// Navigate to `route`, applying the guard.
    ///
    /// `Wait` leaves history untouched so the same navigation can be retried
    /// once the session resolves.
    pub fn navigate(&mut self, route: Route, session: &SessionState) -> GuardDecision {
        let decision = guard(&route, session);
        match &decision {
            GuardDecision::Render => self.push(route),
            GuardDecision::Redirect { to, replace } => {
                self.push(route);
                if *replace {
                    self.replace(to.clone());
                } else {
                    self.push(to.clone());
                }
            }
            GuardDecision::Wait => {}
        }
        decision
    }
}
