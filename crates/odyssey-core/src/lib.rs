//! Client state and orchestration layer between `odyssey-api` and the CLI.
//!
//! - **[`Controller`]** runs the flows behind each screen (login,
//!   catalog, lessons, dashboard, profile) and is the only component that
//!   turns API responses into state.
//!
//! - **[`Store`]** holds three slices (session, courses, progress) in
//!   `tokio::sync::watch` channels. Mutations are pure reducers applied via
//!   [`Store::dispatch`]; consumers take snapshots or subscribe through
//!   [`StateStream`].
//!
//! - **[`guard`]** decides whether a [`Route`] may render, must wait for
//!   session rehydration, or redirects to login.
//!
//! - **[`validate`]** holds the form validators run before any request.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod guard;
pub mod model;
pub mod store;
pub mod stream;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_API_URL, TlsVerification};
pub use controller::{Controller, CourseView, Dashboard, LessonView};
pub use error::CoreError;
pub use guard::{GuardDecision, History, Route};
pub use store::{
    Action, AuthStatus, CoursesAction, CoursesState, KeyedList, ProgressAction, ProgressState,
    SessionAction, SessionState, Store,
};
pub use stream::StateStream;
pub use validate::{
    LoginForm, PasswordChangeForm, ProfileForm, RegistrationForm, ValidationErrors,
};

pub use model::{
    Course, CourseLevel, Instructor, Lesson, LessonStatus, Module, ProgressKey, ProgressRecord,
    Role, User, UserPatch, UserProfile, UserStats,
};
