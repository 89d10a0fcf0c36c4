// Current-user endpoints: profile, stats, enrollments, lesson progress

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    CourseResponse, LessonStatusResponse, PasswordUpdateRequest, ProfileUpdateRequest,
    ProgressResponse, UserProfileResponse, UserStatsResponse,
};

impl ApiClient {
    /// `GET users/profile`
    pub async fn get_profile(&self) -> Result<UserProfileResponse, Error> {
        debug!("fetching profile");
        self.get("users/profile").await
    }

    /// `PUT users/profile`, returns the updated profile.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdateRequest,
    ) -> Result<UserProfileResponse, Error> {
        debug!("updating profile");
        self.put("users/profile", update).await
    }

    /// `PUT users/password` with `{ current, new }`.
    pub async fn update_password(
        &self,
        current: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        debug!("updating password");
        self.put_discard(
            "users/password",
            &PasswordUpdateRequest {
                current: current.expose_secret(),
                new_password: new_password.expose_secret(),
            },
        )
        .await
    }

    /// `GET users/stats`
    pub async fn user_stats(&self) -> Result<UserStatsResponse, Error> {
        debug!("fetching user stats");
        self.get("users/stats").await
    }

    /// `GET users/courses`: courses the current user is enrolled in.
    pub async fn enrolled_courses(&self) -> Result<Vec<CourseResponse>, Error> {
        debug!("listing enrolled courses");
        self.get("users/courses").await
    }

    /// `GET users/progress`: every progress record of the current user.
    pub async fn user_progress(&self) -> Result<Vec<ProgressResponse>, Error> {
        debug!("listing progress records");
        self.get("users/progress").await
    }

    /// `GET users/lessons/{id}`
    pub async fn lesson_status(&self, lesson_id: &str) -> Result<LessonStatusResponse, Error> {
        debug!(lesson_id, "fetching lesson status");
        self.get(&format!("users/lessons/{lesson_id}")).await
    }

    /// `POST users/lessons/{id}/complete`
    pub async fn mark_lesson_complete(&self, lesson_id: &str) -> Result<(), Error> {
        debug!(lesson_id, "marking lesson complete");
        self.post_empty(&format!("users/lessons/{lesson_id}/complete"))
            .await
    }
}
