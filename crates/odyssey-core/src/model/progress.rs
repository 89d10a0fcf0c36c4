// ── Progress domain types ──
//
// One record per (user, course). `ProgressKey` is the identity used by the
// progress slice; nothing matches records by position.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keyed::Keyed;

/// Logical identity of a progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub user_id: String,
    pub course_id: String,
}

impl ProgressKey {
    pub fn new(user_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            course_id: course_id.into(),
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.course_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: String,
    pub status: Option<ProgressStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_exercises: Vec<String>,
    pub lesson_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: bool,
    pub lessons_progress: Vec<LessonProgress>,
    pub module_progress: f64,
}

/// Durable per-user-per-course completion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub course_id: String,
    /// Most recently completed lesson.
    pub lesson_id: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub modules_progress: Vec<ModuleProgress>,
    pub exercises_completed: Vec<String>,
    pub certificate_issued: bool,
    pub certificate_url: Option<String>,
}

impl ProgressRecord {
    /// Fresh record created on enrollment: empty sub-collections, no certificate.
    pub fn enrolled(user_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            course_id: course_id.into(),
            lesson_id: None,
            completed_at: None,
            modules_progress: Vec::new(),
            exercises_completed: Vec::new(),
            certificate_issued: false,
            certificate_url: None,
        }
    }

    /// Copy of this record with `lesson_id` marked as the latest completion.
    pub fn with_completed_lesson(&self, lesson_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            lesson_id: Some(lesson_id.to_owned()),
            completed_at: Some(at),
            ..self.clone()
        }
    }
}

impl Keyed for ProgressRecord {
    type Key = ProgressKey;

    fn key(&self) -> ProgressKey {
        ProgressKey::new(self.user_id.as_str(), self.course_id.as_str())
    }
}
