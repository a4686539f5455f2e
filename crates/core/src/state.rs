//! Persisted learning state of a session.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::certificate::Certificate;
use crate::id::{CourseId, LectureId, UserId};
use crate::progress::{CourseProgress, WatchProgress};
use crate::Time;

/// Everything a session persists between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningState {
    /// Course progress for every enrollment
    pub enrolled_courses: Vec<CourseProgress>,

    /// Lecture progress, grouped by course
    pub progress: BTreeMap<CourseId, Vec<WatchProgress>>,

    /// Issued certificates, including revoked ones
    pub certificates: Vec<Certificate>,
}

impl LearningState {
    /// Enrollment of a learner in a course.
    pub fn enrollment(&self, user_id: &UserId, course_id: &CourseId) -> Option<&CourseProgress> {
        self.enrolled_courses
            .iter()
            .find(|p| &p.user_id == user_id && &p.course_id == course_id)
    }

    /// Mutable enrollment of a learner in a course.
    pub fn enrollment_mut(
        &mut self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Option<&mut CourseProgress> {
        self.enrolled_courses
            .iter_mut()
            .find(|p| &p.user_id == user_id && &p.course_id == course_id)
    }

    /// Lecture progress records of a learner in a course.
    pub fn watch_records<'a>(
        &'a self,
        user_id: &'a UserId,
        course_id: &CourseId,
    ) -> impl Iterator<Item = &'a WatchProgress> + 'a {
        self.progress
            .get(course_id)
            .into_iter()
            .flatten()
            .filter(move |w| &w.user_id == user_id)
    }

    /// Progress of a learner on a lecture.
    pub fn watch(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        lecture_id: &LectureId,
    ) -> Option<&WatchProgress> {
        self.progress
            .get(course_id)?
            .iter()
            .find(|w| &w.user_id == user_id && &w.lecture_id == lecture_id)
    }

    /// Progress of a learner on a lecture, created on first access.
    pub fn watch_entry(
        &mut self,
        user_id: &UserId,
        course_id: &CourseId,
        lecture_id: &LectureId,
        now: Time,
    ) -> &mut WatchProgress {
        let records = self.progress.entry(course_id.clone()).or_default();
        let index = match records
            .iter()
            .position(|w| &w.user_id == user_id && &w.lecture_id == lecture_id)
        {
            Some(index) => index,
            None => {
                records.push(WatchProgress::new(
                    user_id.clone(),
                    course_id.clone(),
                    lecture_id.clone(),
                    now,
                ));
                records.len() - 1
            }
        };
        &mut records[index]
    }

    /// The active certificate of a learner for a course, if any.
    pub fn active_certificate(&self, user_id: &UserId, course_id: &CourseId) -> Option<&Certificate> {
        self.certificates
            .iter()
            .find(|c| c.is_active() && &c.user_id == user_id && &c.course_id == course_id)
    }

    /// Store a certificate unless the holder already has an active one for
    /// the same course. Returns the active certificate and whether it was
    /// created by this call.
    ///
    /// `make` only runs when no active certificate exists.
    pub fn insert_certificate_with(
        &mut self,
        user_id: &UserId,
        course_id: &CourseId,
        make: impl FnOnce() -> Certificate,
    ) -> (Certificate, bool) {
        if let Some(existing) = self.active_certificate(user_id, course_id) {
            return (existing.clone(), false);
        }
        let certificate = make();
        self.certificates.push(certificate.clone());
        (certificate, true)
    }

    /// Look up a certificate by its printed number.
    pub fn certificate_mut(&mut self, number: &str) -> Option<&mut Certificate> {
        self.certificates
            .iter_mut()
            .find(|c| c.certificate_number == number)
    }
}
