// ── Progress slice ──
//
// Per-user-per-course progress records, keyed by `ProgressKey`, plus the
// record for the course currently on screen.

use serde::Serialize;

use super::keyed::{Keyed, KeyedList};
use crate::model::{ProgressKey, ProgressRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressAction {
    /// Add a record unless one with the same key exists.
    Enroll(ProgressRecord),
    /// Upsert a record after a lesson was completed.
    RecordLessonCompletion(ProgressRecord),
    /// Point at a record, whether or not it is in the list.
    SetCurrent(Option<ProgressRecord>),
    FetchStart,
    FetchSuccess(Vec<ProgressRecord>),
    FetchFailed(String),
    /// Drop all records (logout).
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressState {
    records: KeyedList<ProgressRecord>,
    current: Option<ProgressRecord>,
    loading: bool,
    error: Option<String>,
}

impl ProgressState {
    pub fn records(&self) -> &KeyedList<ProgressRecord> {
        &self.records
    }

    pub fn get(&self, key: &ProgressKey) -> Option<&ProgressRecord> {
        self.records.get(key)
    }

    pub fn current(&self) -> Option<&ProgressRecord> {
        self.current.as_ref()
    }

    /// Course ids the given user has a record for.
    pub fn course_ids_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.records
            .iter()
            .filter(move |r| r.user_id == user_id)
            .map(|r| r.course_id.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reduce(&mut self, action: ProgressAction) {
        match action {
            ProgressAction::Enroll(record) => {
                if self.records.insert_if_absent(record.clone()) {
                    self.current = Some(record);
                }
            }
            ProgressAction::RecordLessonCompletion(record) => {
                if self.current.as_ref().is_some_and(|c| c.key() == record.key()) {
                    self.current = Some(record.clone());
                }
                self.records.upsert(record);
            }
            ProgressAction::SetCurrent(record) => self.current = record,
            ProgressAction::FetchStart => {
                self.loading = true;
                self.error = None;
            }
            ProgressAction::FetchSuccess(records) => {
                self.records.replace_all(records);
                self.loading = false;
                // Refresh `current` when the list has a newer copy of it.
                self.current = self
                    .current
                    .take()
                    .map(|c| self.records.get(&c.key()).cloned().unwrap_or(c));
            }
            ProgressAction::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            ProgressAction::Clear => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(user: &str, course: &str) -> ProgressRecord {
        ProgressRecord::enrolled(user, course)
    }

    #[test]
    fn enroll_adds_once_and_sets_current() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));

        assert_eq!(s.records().len(), 1);
        assert_eq!(s.current().map(|r| r.course_id.as_str()), Some("c1"));
    }

    #[test]
    fn enroll_duplicate_does_not_overwrite() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        let mut s = ProgressState::default();
        let mut first = record("u1", "c1");
        first.completed_at = at;
        s.reduce(ProgressAction::Enroll(first));
        s.reduce(ProgressAction::SetCurrent(None));
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));

        let key = ProgressKey::new("u1", "c1");
        assert_eq!(s.get(&key).and_then(|r| r.completed_at), at);
        assert!(s.current().is_none());
    }

    #[test]
    fn set_current_is_independent_of_list() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::SetCurrent(Some(record("u1", "c9"))));

        assert!(s.records().is_empty());
        assert_eq!(s.current().map(|r| r.course_id.as_str()), Some("c9"));

        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        s.reduce(ProgressAction::SetCurrent(Some(record("u1", "c9"))));
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.current().map(|r| r.course_id.as_str()), Some("c9"));
    }

    #[test]
    fn same_course_different_users_are_distinct() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        s.reduce(ProgressAction::Enroll(record("u2", "c1")));
        assert_eq!(s.records().len(), 2);
        assert_eq!(s.course_ids_for("u2").collect::<Vec<_>>(), vec!["c1"]);
    }

    #[test]
    fn lesson_completion_upserts_and_refreshes_current() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));

        let now = Utc::now();
        let updated = record("u1", "c1").with_completed_lesson("l3", now);
        s.reduce(ProgressAction::RecordLessonCompletion(updated));

        assert_eq!(s.records().len(), 1);
        let current = s.current().cloned();
        assert_eq!(
            current.as_ref().and_then(|r| r.lesson_id.as_deref()),
            Some("l3")
        );
        assert_eq!(current.and_then(|r| r.completed_at), Some(now));
    }

    #[test]
    fn lesson_completion_for_other_course_leaves_current() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        let other = record("u1", "c2").with_completed_lesson("x", Utc::now());
        s.reduce(ProgressAction::RecordLessonCompletion(other));

        assert_eq!(s.records().len(), 2);
        assert_eq!(s.current().map(|r| r.course_id.as_str()), Some("c1"));
    }

    #[test]
    fn fetch_success_replaces_and_tracks_current() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        s.reduce(ProgressAction::FetchStart);
        assert!(s.is_loading());

        let fresh = record("u1", "c1").with_completed_lesson("l9", Utc::now());
        s.reduce(ProgressAction::FetchSuccess(vec![fresh, record("u1", "c2")]));

        assert!(!s.is_loading());
        assert_eq!(s.records().len(), 2);
        assert_eq!(
            s.current().and_then(|r| r.lesson_id.as_deref()),
            Some("l9")
        );
    }

    #[test]
    fn fetch_failed_and_clear() {
        let mut s = ProgressState::default();
        s.reduce(ProgressAction::Enroll(record("u1", "c1")));
        s.reduce(ProgressAction::FetchFailed("offline".into()));
        assert_eq!(s.error(), Some("offline"));
        assert_eq!(s.records().len(), 1);

        s.reduce(ProgressAction::Clear);
        assert_eq!(s, ProgressState::default());
    }
}
