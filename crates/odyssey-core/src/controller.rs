// ── Controller ──
//
// Orchestrates the flows behind each screen: calls the API, dispatches the
// resulting actions into the store, and returns view data. Services stay
// stateless; this is the only place where requests turn into state.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use odyssey_api::types::ProfileUpdateRequest;
use odyssey_api::{ApiClient, TokenStore};

use crate::config::ClientConfig;
use crate::convert;
use crate::error::CoreError;
use crate::guard::{self, GuardDecision, Route};
use crate::model::{
    Course, Lesson, ProgressKey, ProgressRecord, User, UserPatch, UserProfile, UserStats,
};
use crate::store::{CoursesAction, ProgressAction, SessionAction, SessionState, Store};
use crate::validate::{self, LoginForm, PasswordChangeForm, ProfileForm, RegistrationForm};

/// How many catalog courses the dashboard suggests.
const RECOMMENDED_COUNT: usize = 3;

const EMAIL_TAKEN: &str = "This email is already in use";

// ── View data ────────────────────────────────────────────────────────

/// A course plus the viewer's relationship to it.
#[derive(Debug, Clone, Serialize)]
pub struct CourseView {
    pub course: Course,
    pub enrolled: bool,
    pub progress: Option<ProgressRecord>,
}

/// A lesson with its neighbours inside the course.
#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    pub course_id: String,
    pub course_title: String,
    pub lesson: Lesson,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub stats: UserStats,
    pub enrolled: Vec<Course>,
    pub recommended: Vec<Course>,
}

// ── Controller ───────────────────────────────────────────────────────

/// Entry point for every client surface.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    api: ApiClient,
    store: Store,
}

impl Controller {
    /// Build a controller with its own HTTP client. Does not touch the
    /// network; call [`restore_session`](Self::restore_session) first.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.base_url.as_str(), &config.transport(), tokens)?;
        Ok(Self::with_api(config, api))
    }

    /// Wrap an already-built API client.
    pub fn with_api(config: ClientConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                store: Store::new(),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> SessionState {
        self.inner.store.session()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Startup rehydration: resolve a persisted token into a user.
    ///
    /// Any failure counts as "not logged in": the token is removed and the
    /// session resolves to unauthenticated.
    pub async fn restore_session(&self) -> SessionState {
        let store = &self.inner.store;
        match self.inner.api.current_user().await {
            Ok(Some(profile)) => {
                let user = UserProfile::from(profile).to_user();
                info!(user = %user.email, "session restored");
                store.dispatch(SessionAction::SetUser(user));
            }
            Ok(None) => {
                debug!("no stored token");
                store.dispatch(SessionAction::ClearUser);
            }
            Err(e) => {
                warn!(error = %e, "stored token rejected, clearing session");
                self.drop_token();
                store.dispatch(SessionAction::ClearUser);
            }
        }
        store.session()
    }

    pub async fn login(&self, form: &LoginForm) -> Result<User, CoreError> {
        validate::validate_login(form)?;
        let store = &self.inner.store;
        store.dispatch(SessionAction::BeginAuth);

        match self.inner.api.login(form.email.trim(), &form.password).await {
            Ok(resp) => {
                let user = User::from(resp.user);
                info!(user = %user.email, "logged in");
                store.dispatch(SessionAction::SetUser(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "login failed");
                store.dispatch(SessionAction::AuthFailed(err.user_message()));
                Err(err)
            }
        }
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<User, CoreError> {
        validate::validate_registration(form)?;
        let store = &self.inner.store;
        store.dispatch(SessionAction::BeginAuth);

        let result = self
            .inner
            .api
            .register(form.name.trim(), form.email.trim(), &form.password)
            .await;
        match result {
            Ok(resp) => {
                let user = User::from(resp.user);
                info!(user = %user.email, "registered");
                store.dispatch(SessionAction::SetUser(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let err = CoreError::from(e).conflict_on("email", EMAIL_TAKEN);
                warn!(error = %err, "registration failed");
                store.dispatch(SessionAction::AuthFailed(err.user_message()));
                Err(err)
            }
        }
    }

    /// Remove the token and reset user-scoped state.
    pub fn logout(&self) -> Result<(), CoreError> {
        let result = self.inner.api.logout().map_err(CoreError::from);
        let store = &self.inner.store;
        store.dispatch(SessionAction::ClearUser);
        store.dispatch(ProgressAction::Clear);
        info!("logged out");
        result
    }

    /// Evaluate the guard against the current session, without waiting.
    pub fn guard(&self, route: &Route) -> GuardDecision {
        guard::guard(route, &self.inner.store.session())
    }

    /// Wait for rehydration to finish, then evaluate the guard.
    pub async fn authorize(&self, route: &Route) -> GuardDecision {
        let session = self.inner.store.session_resolved().await;
        guard::guard(route, &session)
    }

    // ── Courses ──────────────────────────────────────────────────────

    pub async fn load_catalog(&self) -> Result<Vec<Course>, CoreError> {
        let store = &self.inner.store;
        store.dispatch(CoursesAction::FetchStart);
        match self.inner.api.list_courses().await {
            Ok(list) => {
                let courses: Vec<Course> = list.into_iter().map(Course::from).collect();
                debug!(count = courses.len(), "catalog loaded");
                store.dispatch(CoursesAction::FetchSuccess(courses.clone()));
                Ok(courses)
            }
            Err(e) => {
                let err = self.handle_error(e);
                store.dispatch(CoursesAction::FetchFailed(err.user_message()));
                Err(err)
            }
        }
    }

    /// Fetch a course and, when logged in, the user's progress with it.
    pub async fn open_course(&self, course_id: &str) -> Result<CourseView, CoreError> {
        let store = &self.inner.store;
        let api = &self.inner.api;
        let fetched = if store.session().is_authenticated() {
            tokio::try_join!(api.get_course(course_id), api.user_progress())
                .map(|(course, progress)| (course, Some(progress)))
        } else {
            api.get_course(course_id).await.map(|course| (course, None))
        };
        let (course, progress) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                let err = self.handle_error(e);
                store.dispatch(CoursesAction::FetchFailed(err.user_message()));
                return Err(err);
            }
        };
        let course = Course::from(course);
        store.dispatch(CoursesAction::SetCurrent(course.clone()));
        if let Some(list) = progress {
            store.dispatch(ProgressAction::FetchSuccess(
                list.into_iter().map(ProgressRecord::from).collect(),
            ));
        }

        let progress = self
            .progress_key(&course.id)
            .and_then(|k| store.progress().get(&k).cloned());
        store.dispatch(ProgressAction::SetCurrent(progress.clone()));

        Ok(CourseView {
            enrolled: progress.is_some(),
            course,
            progress,
        })
    }

    /// Lessons of a course in syllabus order.
    pub async fn course_lessons(&self, course_id: &str) -> Result<Vec<Lesson>, CoreError> {
        let lessons = self
            .inner
            .api
            .list_lessons(course_id)
            .await
            .map_err(|e| self.handle_error(e))?;
        Ok(lessons.into_iter().map(Lesson::from).collect())
    }

    /// Enroll the current user. Enrolling twice keeps the first record.
    pub async fn enroll(&self, course_id: &str) -> Result<ProgressRecord, CoreError> {
        let user = self.require_user()?;
        self.inner
            .api
            .enroll(course_id)
            .await
            .map_err(|e| self.handle_error(e))?;

        let store = &self.inner.store;
        store.dispatch(ProgressAction::Enroll(ProgressRecord::enrolled(
            user.id.as_str(),
            course_id,
        )));
        info!(course = course_id, "enrolled");

        let key = ProgressKey::new(user.id, course_id);
        store
            .progress()
            .get(&key)
            .cloned()
            .ok_or_else(|| CoreError::Internal(format!("progress record {key} missing")))
    }

    // ── Lessons ──────────────────────────────────────────────────────

    pub async fn open_lesson(
        &self,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<LessonView, CoreError> {
        let api = &self.inner.api;
        let (course, lesson) = tokio::try_join!(
            api.get_course(course_id),
            api.get_lesson(course_id, lesson_id)
        )
        .map_err(|e| self.handle_error(e))?;
        let course = Course::from(course);
        let lesson = Lesson::from(lesson);

        let ids: Vec<&str> = course.lessons().map(|l| l.id.as_str()).collect();
        let position = ids.iter().position(|id| *id == lesson.id);
        let previous = position
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| ids.get(i))
            .map(|id| (*id).to_owned());
        let next = position
            .and_then(|i| ids.get(i + 1))
            .map(|id| (*id).to_owned());

        let completed = if self.inner.store.session().is_authenticated() {
            match api.lesson_status(lesson_id).await {
                Ok(status) => convert::lesson_status(lesson_id, status).is_completed,
                Err(e) => {
                    let err = self.handle_error(e);
                    if err.is_unauthorized() {
                        return Err(err);
                    }
                    debug!(error = %err, "lesson status unavailable");
                    false
                }
            }
        } else {
            false
        };

        self.inner
            .store
            .dispatch(CoursesAction::SetCurrent(course.clone()));

        Ok(LessonView {
            course_id: course.id,
            course_title: course.title,
            lesson,
            previous,
            next,
            completed,
        })
    }

    /// Mark a lesson complete and record it against the course progress.
    ///
    /// The stored record is refreshed from the backend first so the
    /// update keeps its modules and exercises.
    pub async fn complete_lesson(
        &self,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<ProgressRecord, CoreError> {
        let user = self.require_user()?;
        let api = &self.inner.api;
        let ((), list) = tokio::try_join!(
            api.mark_lesson_complete(lesson_id),
            api.user_progress()
        )
        .map_err(|e| self.handle_error(e))?;

        let store = &self.inner.store;
        store.dispatch(ProgressAction::FetchSuccess(
            list.into_iter().map(ProgressRecord::from).collect(),
        ));
        let key = ProgressKey::new(user.id.as_str(), course_id);
        let record = store
            .progress()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ProgressRecord::enrolled(user.id.as_str(), course_id))
            .with_completed_lesson(lesson_id, Utc::now());

        store.dispatch(ProgressAction::RecordLessonCompletion(record.clone()));
        store.dispatch(ProgressAction::SetCurrent(Some(record.clone())));
        info!(course = course_id, lesson = lesson_id, "lesson completed");
        Ok(record)
    }

    // ── Progress & dashboard ─────────────────────────────────────────

    pub async fn load_progress(&self) -> Result<Vec<ProgressRecord>, CoreError> {
        self.require_user()?;
        let store = &self.inner.store;
        store.dispatch(ProgressAction::FetchStart);
        match self.inner.api.user_progress().await {
            Ok(list) => {
                let records: Vec<ProgressRecord> =
                    list.into_iter().map(ProgressRecord::from).collect();
                store.dispatch(ProgressAction::FetchSuccess(records.clone()));
                Ok(records)
            }
            Err(e) => {
                let err = self.handle_error(e);
                store.dispatch(ProgressAction::FetchFailed(err.user_message()));
                Err(err)
            }
        }
    }

    pub async fn load_dashboard(&self) -> Result<Dashboard, CoreError> {
        let user = self.require_user()?;
        let api = &self.inner.api;
        let (stats, enrolled) = tokio::try_join!(api.user_stats(), api.enrolled_courses())
            .map_err(|e| self.handle_error(e))?;
        let enrolled: Vec<Course> = enrolled.into_iter().map(Course::from).collect();
        let catalog = self.load_catalog().await?;

        Ok(Dashboard {
            user,
            stats: stats.into(),
            recommended: recommend(&catalog, &enrolled),
            enrolled,
        })
    }

    // ── Profile ──────────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<UserProfile, CoreError> {
        self.require_user()?;
        self.inner
            .api
            .get_profile()
            .await
            .map(UserProfile::from)
            .map_err(|e| self.handle_error(e))
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UserProfile, CoreError> {
        validate::validate_profile(form)?;
        self.require_user()?;

        let request = ProfileUpdateRequest {
            name: Some(form.name.trim().to_owned()),
            email: Some(form.email.trim().to_owned()),
            bio: form.bio.clone(),
            preferences: form.preferences.clone(),
        };
        let profile = self
            .inner
            .api
            .update_profile(&request)
            .await
            .map(UserProfile::from)
            .map_err(|e| self.handle_error(e).conflict_on("email", EMAIL_TAKEN))?;

        self.inner.store.dispatch(SessionAction::UpdateUser(UserPatch {
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            avatar: profile.avatar.clone(),
            role: profile.role,
        }));
        info!("profile updated");
        Ok(profile)
    }

    pub async fn change_password(&self, form: &PasswordChangeForm) -> Result<(), CoreError> {
        validate::validate_password_change(form)?;
        self.require_user()?;
        self.inner
            .api
            .update_password(&form.current, &form.new_password)
            .await
            .map_err(|e| self.handle_error(e))?;
        info!("password changed");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn require_user(&self) -> Result<User, CoreError> {
        self.inner
            .store
            .session()
            .user()
            .cloned()
            .ok_or_else(|| CoreError::Unauthorized {
                message: "login required".into(),
            })
    }

    fn progress_key(&self, course_id: &str) -> Option<ProgressKey> {
        self.inner
            .store
            .session()
            .user()
            .map(|u| ProgressKey::new(u.id.as_str(), course_id))
    }

    /// Convert an API error; a rejected token ends the session.
    fn handle_error(&self, err: odyssey_api::Error) -> CoreError {
        if err.is_unauthorized() {
            warn!("token rejected, clearing session");
            self.drop_token();
            self.inner.store.dispatch(SessionAction::ClearUser);
            self.inner.store.dispatch(ProgressAction::Clear);
        }
        err.into()
    }

    fn drop_token(&self) {
        if let Err(e) = self.inner.api.tokens().clear() {
            warn!(error = %e, "failed to clear stored token");
        }
    }
}

/// First catalog courses the user is not enrolled in.
fn recommend(catalog: &[Course], enrolled: &[Course]) -> Vec<Course> {
    let taken: HashSet<&str> = enrolled.iter().map(|c| c.id.as_str()).collect();
    catalog
        .iter()
        .filter(|c| !taken.contains(c.id.as_str()))
        .take(RECOMMENDED_COUNT)
        .cloned()
        .collect()
}
