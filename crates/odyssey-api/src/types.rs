// Wire types for the CodeOdyssey REST API.
//
// These mirror the JSON the backend sends and expects. Fields the backend
// may omit are defaulted so a sparse payload still deserializes; strong
// typing (roles, levels, timestamps) happens in `odyssey-core`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Errors ───────────────────────────────────────────────────────────

/// Error body shape: `{"message": "...", "code": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `{ token, user }` returned by login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: UserResponse,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetailsResponse {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLinkResponse>,
}

/// Full profile from `GET users/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile: ProfileDetailsResponse,
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordUpdateRequest<'a> {
    pub current: &'a str,
    #[serde(rename = "new")]
    pub new_password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStatsResponse {
    pub courses_enrolled: u32,
    pub courses_completed: u32,
    pub exercises_completed: u32,
    pub total_points: u32,
    pub streak: u32,
    pub average_score: f64,
}

/// Completion state of a single lesson for the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonStatusResponse {
    pub lesson_id: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<String>,
}

// ── Courses ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstructorResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonResponse {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    /// Minutes.
    pub duration: u32,
    #[serde(alias = "exerciseIds")]
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleResponse {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub lessons: Vec<LessonResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseResponse {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: String,
    pub technologies: Vec<String>,
    pub modules: Vec<ModuleResponse>,
    pub enrolled_count: u32,
    pub rating: f64,
    pub instructor: Option<InstructorResponse>,
}

// ── Progress ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonProgressResponse {
    pub lesson_id: String,
    pub status: Option<String>,
    pub completed_at: Option<String>,
    pub completed_exercises: Vec<String>,
    pub lesson_progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleProgressResponse {
    pub module_id: String,
    pub completed: bool,
    pub lessons_progress: Vec<LessonProgressResponse>,
    pub module_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub modules_progress: Vec<ModuleProgressResponse>,
    #[serde(default)]
    pub exercises_completed: Vec<String>,
    #[serde(default)]
    pub certificate_issued: bool,
    #[serde(default)]
    pub certificate_url: Option<String>,
}
