// ── Courses slice ──
//
// Catalog list plus the course currently on screen.

use serde::Serialize;

use crate::model::Course;

#[derive(Debug, Clone, PartialEq)]
pub enum CoursesAction {
    FetchStart,
    FetchSuccess(Vec<Course>),
    FetchFailed(String),
    SetCurrent(Course),
    ClearCurrent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoursesState {
    courses: Vec<Course>,
    current: Option<Course>,
    loading: bool,
    error: Option<String>,
}

impl CoursesState {
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn current(&self) -> Option<&Course> {
        self.current.as_ref()
    }

    pub fn find(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reduce(&mut self, action: CoursesAction) {
        match action {
            CoursesAction::FetchStart => {
                self.loading = true;
                self.error = None;
            }
            CoursesAction::FetchSuccess(courses) => {
                self.courses = courses;
                self.loading = false;
            }
            CoursesAction::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CoursesAction::SetCurrent(course) => self.current = Some(course),
            CoursesAction::ClearCurrent => self.current = None,
        }
    }
}
