// ── API-to-domain type conversions ──
//
// Bridges raw `odyssey_api` wire types into canonical domain types.
// Unknown enum strings become `None` rather than failing the whole payload.

use chrono::{DateTime, NaiveDateTime, Utc};
use odyssey_api::types::{
    CourseResponse, InstructorResponse, LessonProgressResponse, LessonResponse,
    LessonStatusResponse, ModuleProgressResponse, ModuleResponse, ProgressResponse,
    UserProfileResponse, UserResponse, UserStatsResponse,
};

use crate::model::{
    Course, CourseLevel, Instructor, Lesson, LessonProgress, LessonStatus, Module,
    ModuleProgress, ProgressRecord, ProgressStatus, Role, SocialLink, User, UserProfile,
    UserStats,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// RFC 3339, or a zone-less `2024-06-15T10:30:00[.fff]` taken as UTC.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_role(raw: Option<&str>) -> Option<Role> {
    raw.and_then(|r| r.parse().ok())
}

fn parse_progress_status(raw: Option<&str>) -> Option<ProgressStatus> {
    match raw?.to_ascii_uppercase().as_str() {
        "NOT_STARTED" => Some(ProgressStatus::NotStarted),
        "IN_PROGRESS" => Some(ProgressStatus::InProgress),
        "COMPLETED" => Some(ProgressStatus::Completed),
        _ => None,
    }
}

// ── Users ────────────────────────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            role: parse_role(u.role.as_deref()),
            id: u.id,
            name: u.name,
            email: u.email,
            avatar: u.avatar,
        }
    }
}

impl From<UserProfileResponse> for UserProfile {
    fn from(p: UserProfileResponse) -> Self {
        Self {
            role: parse_role(p.role.as_deref()),
            created_at: parse_datetime(p.created_at.as_deref()),
            last_login: parse_datetime(p.last_login.as_deref()),
            id: p.id,
            name: p.name,
            email: p.email,
            avatar: p.profile.avatar,
            bio: p.profile.bio,
            social_links: p
                .profile
                .social_links
                .into_iter()
                .map(|l| SocialLink {
                    kind: l.kind,
                    url: l.url,
                })
                .collect(),
            preferences: p.preferences,
        }
    }
}

impl From<UserStatsResponse> for UserStats {
    fn from(s: UserStatsResponse) -> Self {
        Self {
            courses_enrolled: s.courses_enrolled,
            courses_completed: s.courses_completed,
            exercises_completed: s.exercises_completed,
            total_points: s.total_points,
            streak: s.streak,
            average_score: s.average_score,
        }
    }
}

// ── Courses ──────────────────────────────────────────────────────────

impl From<InstructorResponse> for Instructor {
    fn from(i: InstructorResponse) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}

impl From<LessonResponse> for Lesson {
    fn from(l: LessonResponse) -> Self {
        Self {
            id: l.id,
            title: l.title,
            content: l.content,
            video_url: l.video_url.filter(|u| !u.is_empty()),
            duration: l.duration,
            exercises: l.exercises,
        }
    }
}

impl From<ModuleResponse> for Module {
    fn from(m: ModuleResponse) -> Self {
        Self {
            id: m.id,
            title: m.title,
            lessons: m.lessons.into_iter().map(Lesson::from).collect(),
        }
    }
}

impl From<CourseResponse> for Course {
    fn from(c: CourseResponse) -> Self {
        Self {
            level: c.level.parse::<CourseLevel>().ok(),
            id: c.id,
            title: c.title,
            description: c.description,
            technologies: c.technologies,
            modules: c.modules.into_iter().map(Module::from).collect(),
            enrolled_count: c.enrolled_count,
            rating: c.rating,
            instructor: c.instructor.map(Instructor::from),
        }
    }
}

/// The requested id wins when the payload omits its own.
pub(crate) fn lesson_status(lesson_id: &str, s: LessonStatusResponse) -> LessonStatus {
    LessonStatus {
        lesson_id: s
            .lesson_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| lesson_id.to_owned()),
        is_completed: s.is_completed,
        completed_at: parse_datetime(s.completed_at.as_deref()),
    }
}

// ── Progress ─────────────────────────────────────────────────────────

impl From<LessonProgressResponse> for LessonProgress {
    fn from(l: LessonProgressResponse) -> Self {
        Self {
            status: parse_progress_status(l.status.as_deref()),
            completed_at: parse_datetime(l.completed_at.as_deref()),
            lesson_id: l.lesson_id,
            completed_exercises: l.completed_exercises,
            lesson_progress: l.lesson_progress,
        }
    }
}

impl From<ModuleProgressResponse> for ModuleProgress {
    fn from(m: ModuleProgressResponse) -> Self {
        Self {
            module_id: m.module_id,
            completed: m.completed,
            lessons_progress: m
                .lessons_progress
                .into_iter()
                .map(LessonProgress::from)
                .collect(),
            module_progress: m.module_progress,
        }
    }
}

impl From<ProgressResponse> for ProgressRecord {
    fn from(p: ProgressResponse) -> Self {
        Self {
            completed_at: parse_datetime(p.completed_at.as_deref()),
            user_id: p.user_id,
            course_id: p.course_id,
            lesson_id: p.lesson_id,
            modules_progress: p
                .modules_progress
                .into_iter()
                .map(ModuleProgress::from)
                .collect(),
            exercises_completed: p.exercises_completed,
            certificate_issued: p.certificate_issued,
            certificate_url: p.certificate_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn datetime_accepts_rfc3339_and_naive() {
        let a = parse_datetime(Some("2024-06-15T10:30:00Z")).unwrap();
        let b = parse_datetime(Some("2024-06-15T10:30:00.123")).unwrap();
        assert_eq!(a.day(), 15);
        assert_eq!(b.hour(), 10);
        assert!(parse_datetime(Some("yesterday")).is_none());
        assert!(parse_datetime(None).is_none());
    }

    #[test]
    fn user_role_is_parsed_loosely() {
        let resp: UserResponse = serde_json::from_value(json!({
            "id": "1", "name": "Ana", "email": "a@b.co", "role": "ADMIN"
        }))
        .unwrap();
        assert_eq!(User::from(resp).role, Some(Role::Admin));

        let resp: UserResponse =
            serde_json::from_value(json!({ "id": "2", "role": "wizard" })).unwrap();
        assert_eq!(User::from(resp).role, None);
    }

    #[test]
    fn course_keeps_module_order() {
        let resp: CourseResponse = serde_json::from_value(json!({
            "id": "c1",
            "title": "Rust",
            "level": "Intermediate",
            "modules": [
                { "id": "m1", "lessons": [{ "id": "l1" }, { "id": "l2" }] },
                { "id": "m2", "lessons": [{ "id": "l3", "videoUrl": "" }] }
            ]
        }))
        .unwrap();
        let course = Course::from(resp);

        assert_eq!(course.level, Some(CourseLevel::Intermediate));
        let ids: Vec<_> = course.lessons().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2", "l3"]);
        assert!(course.lessons().all(|l| l.video_url.is_none()));
    }

    #[test]
    fn progress_record_converts_nested() {
        let resp: ProgressResponse = serde_json::from_value(json!({
            "userId": "u1",
            "courseId": "c1",
            "lessonId": "l2",
            "completedAt": "2024-06-15T10:30:00",
            "modulesProgress": [{
                "moduleId": "m1",
                "lessonsProgress": [{ "lessonId": "l2", "status": "COMPLETED" }],
                "moduleProgress": 50.0
            }]
        }))
        .unwrap();
        let record = ProgressRecord::from(resp);

        assert_eq!(record.lesson_id.as_deref(), Some("l2"));
        assert!(record.completed_at.is_some());
        assert_eq!(
            record.modules_progress[0].lessons_progress[0].status,
            Some(ProgressStatus::Completed)
        );
    }

    #[test]
    fn lesson_status_falls_back_to_requested_id() {
        let status = lesson_status("l9", LessonStatusResponse::default());
        assert_eq!(status.lesson_id, "l9");
        assert!(!status.is_completed);
    }
}
