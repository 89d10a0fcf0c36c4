// Course catalog endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{CourseResponse, LessonResponse};

impl ApiClient {
    /// `GET courses`
    pub async fn list_courses(&self) -> Result<Vec<CourseResponse>, Error> {
        debug!("listing courses");
        self.get("courses").await
    }

    /// `GET courses/{id}`
    pub async fn get_course(&self, course_id: &str) -> Result<CourseResponse, Error> {
        debug!(course_id, "fetching course");
        self.get(&format!("courses/{course_id}")).await
    }

    /// `GET courses/{id}/lessons`, in course order.
    pub async fn list_lessons(&self, course_id: &str) -> Result<Vec<LessonResponse>, Error> {
        debug!(course_id, "listing lessons");
        self.get(&format!("courses/{course_id}/lessons")).await
    }

    /// `GET courses/{id}/lessons/{lessonId}`
    pub async fn get_lesson(&self, course_id: &str, lesson_id: &str) -> Result<LessonResponse, Error> {
        debug!(course_id, lesson_id, "fetching lesson");
        self.get(&format!("courses/{course_id}/lessons/{lesson_id}"))
            .await
    }

    /// Enroll the current user.
    ///
    /// `POST courses/{id}/enroll`. The response body is ignored; enrollment
    /// state is tracked client-side by the progress slice.
    pub async fn enroll(&self, course_id: &str) -> Result<(), Error> {
        debug!(course_id, "enrolling");
        self.post_empty(&format!("courses/{course_id}/enroll")).await
    }
}
