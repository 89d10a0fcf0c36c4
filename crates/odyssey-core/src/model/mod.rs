// ── Domain model ──
//
// Canonical client-side types. Wire payloads from `odyssey-api` are
// converted into these in `crate::convert`.

pub mod course;
pub mod progress;
pub mod user;

pub use course::{Course, CourseLevel, Instructor, Lesson, LessonStatus, Module};
pub use progress::{LessonProgress, ModuleProgress, ProgressKey, ProgressRecord, ProgressStatus};
pub use user::{Role, SocialLink, User, UserPatch, UserProfile, UserStats};
