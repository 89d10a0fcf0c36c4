#![allow(clippy::unwrap_used)]
// End-to-end controller flows against a wiremock backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use odyssey_api::{MemoryTokenStore, TokenStore};
use odyssey_core::{
    AuthStatus, ClientConfig, Controller, CoreError, GuardDecision, LoginForm, ProgressKey,
    RegistrationForm, Route,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(tokens: Arc<MemoryTokenStore>) -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        base_url: Url::parse(&format!("{}/api/", server.uri())).unwrap(),
        ..ClientConfig::default()
    };
    let controller = Controller::new(config, tokens).unwrap();
    (server, controller)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn login_form() -> LoginForm {
    LoginForm {
        email: "ana@example.com".into(),
        password: secret("hunter22"),
    }
}

fn profile_body() -> Value {
    json!({ "id": "1", "name": "Ana", "email": "ana@example.com", "role": "student" })
}

fn course_body(id: &str, lessons: &[&str]) -> Value {
    json!({
        "id": id,
        "title": format!("Course {id}"),
        "level": "beginner",
        "modules": [{
            "id": "m1",
            "title": "Basics",
            "lessons": lessons.iter().map(|l| json!({ "id": l, "title": l })).collect::<Vec<_>>()
        }]
    })
}

async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(server)
        .await;
}

/// Controller with a restored session for user "1".
async fn logged_in() -> (MockServer, Controller, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::with_token("abc"));
    let (server, controller) = setup(Arc::clone(&tokens)).await;
    mount_profile(&server).await;
    let session = controller.restore_session().await;
    assert!(session.is_authenticated());
    (server, controller, tokens)
}

// ── Rehydration ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_token_at_startup_clears_session() {
    let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
    let (server, controller) = setup(Arc::clone(&tokens)).await;

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = controller.restore_session().await;

    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert!(session.user().is_none());
    assert!(tokens.load().unwrap().is_none());
    assert_eq!(
        controller.guard(&Route::Dashboard),
        GuardDecision::Redirect {
            to: Route::Login,
            replace: true
        }
    );
}

#[tokio::test]
async fn test_unreachable_backend_at_startup_clears_session() {
    let tokens = Arc::new(MemoryTokenStore::with_token("abc"));
    let (server, controller) = setup(Arc::clone(&tokens)).await;
    drop(server);

    let session = controller.restore_session().await;
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert!(tokens.load().unwrap().is_none());
}

#[tokio::test]
async fn test_valid_token_restores_user() {
    let (_server, controller, _tokens) = logged_in().await;

    let session = controller.session();
    assert_eq!(session.user().unwrap().name, "Ana");
    assert_eq!(controller.guard(&Route::Profile), GuardDecision::Render);
}

#[tokio::test]
async fn test_no_token_resolves_without_request() {
    let (server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = controller.restore_session().await;
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn test_guard_waits_until_rehydration_finishes() {
    let tokens = Arc::new(MemoryTokenStore::with_token("abc"));
    let (server, controller) = setup(tokens).await;
    mount_profile(&server).await;

    let route = Route::Lesson {
        course_id: "c1".into(),
        lesson_id: "l1".into(),
    };
    assert_eq!(controller.guard(&route), GuardDecision::Wait);

    let pending = {
        let controller = controller.clone();
        let route = route.clone();
        tokio::spawn(async move { controller.authorize(&route).await })
    };
    controller.restore_session().await;

    assert_eq!(pending.await.unwrap(), GuardDecision::Render);
}

// ── Login / register ────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sets_user_and_persists_token() {
    let tokens = Arc::new(MemoryTokenStore::new());
    let (server, controller) = setup(Arc::clone(&tokens)).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "user": { "id": "1", "name": "Ana" }
        })))
        .mount(&server)
        .await;

    let user = controller.login(&login_form()).await.unwrap();

    assert_eq!(user.id, "1");
    let session = controller.session();
    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(session.user().unwrap().name, "Ana");
    assert!(!session.is_loading());
    assert_eq!(tokens.load().unwrap().unwrap().expose_secret(), "abc");
}

#[tokio::test]
async fn test_failed_login_records_error() {
    let (server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    controller.restore_session().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let err = controller.login(&login_form()).await.unwrap_err();

    assert!(err.is_unauthorized());
    let session = controller.session();
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert!(session.error().is_some());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_invalid_login_form_makes_no_request() {
    let (server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let form = LoginForm {
        email: "not-an-email".into(),
        password: secret(""),
    };
    match controller.login(&form).await {
        Err(CoreError::Validation(errors)) => {
            assert!(errors.get("email").is_some());
            assert!(errors.get("password").is_some());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(!controller.session().is_loading());
}

#[tokio::test]
async fn test_register_duplicate_email_maps_to_email_field() {
    let (server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let form = RegistrationForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        password: secret("hunter22"),
        confirm_password: secret("hunter22"),
        accept_terms: true,
    };
    let err = controller.register(&form).await.unwrap_err();

    let fields = err.field_errors().unwrap();
    assert_eq!(fields.get("email"), Some("This email is already in use"));
}

// ── Progress ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_enrolling_twice_keeps_one_record() {
    let (server, controller, _tokens) = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/courses/c1/enroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    controller.enroll("c1").await.unwrap();
    controller.enroll("c1").await.unwrap();

    let progress = controller.store().progress();
    assert_eq!(progress.records().len(), 1);
    assert_eq!(progress.current().unwrap().course_id, "c1");
}

#[tokio::test]
async fn test_completing_lesson_updates_current_record() {
    let (server, controller, _tokens) = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/users/lessons/l2/complete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "userId": "1",
            "courseId": "c1",
            "lessonId": "l1",
            "exercisesCompleted": ["e1"]
        }])))
        .mount(&server)
        .await;

    let record = controller.complete_lesson("c1", "l2").await.unwrap();

    assert_eq!(record.lesson_id.as_deref(), Some("l2"));
    assert_eq!(record.exercises_completed, vec!["e1".to_string()]);
    let progress = controller.store().progress();
    assert_eq!(progress.records().len(), 1);
    assert_eq!(progress.current(), Some(&record));
    assert_eq!(progress.get(&ProgressKey::new("1", "c1")), Some(&record));
}

#[tokio::test]
async fn test_open_course_reports_backend_enrollment() {
    let (server, controller, _tokens) = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(course_body("c1", &["l1"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "userId": "1", "courseId": "c1", "lessonId": "l1" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let view = controller.open_course("c1").await.unwrap();

    assert!(view.enrolled);
    assert_eq!(
        view.progress.as_ref().and_then(|p| p.lesson_id.as_deref()),
        Some("l1")
    );
    assert_eq!(
        controller.store().progress().current().map(|p| p.course_id.as_str()),
        Some("c1")
    );
}

#[tokio::test]
async fn test_open_course_anonymous_skips_progress() {
    let (server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    controller.restore_session().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(course_body("c1", &["l1"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let view = controller.open_course("c1").await.unwrap();
    assert!(!view.enrolled);
    assert!(view.progress.is_none());
}

#[tokio::test]
async fn test_enroll_requires_session() {
    let (_server, controller) = setup(Arc::new(MemoryTokenStore::new())).await;
    controller.restore_session().await;

    let err = controller.enroll("c1").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_expired_token_mid_session_logs_out() {
    let (server, controller, tokens) = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/users/progress"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = controller.load_progress().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(controller.session().status(), AuthStatus::Unauthenticated);
    assert!(tokens.load().unwrap().is_none());
}

// ── Lessons & dashboard ─────────────────────────────────────────────

#[tokio::test]
async fn test_open_lesson_reports_neighbours() {
    let (server, controller, _tokens) = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(course_body("c1", &["l1", "l2", "l3"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/courses/c1/lessons/l2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l2", "title": "Borrowing" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/lessons/l2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isCompleted": true })))
        .mount(&server)
        .await;

    let view = controller.open_lesson("c1", "l2").await.unwrap();

    assert_eq!(view.previous.as_deref(), Some("l1"));
    assert_eq!(view.next.as_deref(), Some("l3"));
    assert!(view.completed);
    assert_eq!(view.course_title, "Course c1");
}

#[tokio::test]
async fn test_dashboard_recommends_unenrolled_courses() {
    let (server, controller, _tokens) = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/users/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalPoints": 10 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([course_body("c2", &[])])))
        .mount(&server)
        .await;
    let catalog: Vec<Value> = ["c1", "c2", "c3", "c4", "c5"]
        .iter()
        .map(|id| course_body(id, &[]))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
        .mount(&server)
        .await;

    let dashboard = controller.load_dashboard().await.unwrap();

    assert_eq!(dashboard.stats.total_points, 10);
    assert_eq!(dashboard.enrolled.len(), 1);
    let recommended: Vec<_> = dashboard.recommended.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(recommended, vec!["c1", "c3", "c4"]);
    assert_eq!(controller.store().courses().courses().len(), 5);
}

#[tokio::test]
async fn test_logout_clears_token_and_progress() {
    let (server, controller, tokens) = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/courses/c1/enroll"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    controller.enroll("c1").await.unwrap();

    controller.logout().unwrap();

    assert!(tokens.load().unwrap().is_none());
    assert_eq!(controller.session().status(), AuthStatus::Unauthenticated);
    assert!(controller.store().progress().records().is_empty());
}
