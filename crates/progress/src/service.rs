//! Learning service - the session boundary around the progress rules.

use chrono::Utc;
use academy_core::{
    Catalog, Certificate, Course, CourseId, CourseProgress, LearningState, Learner, Lecture,
    LectureId,
};
use academy_storage::Storage;
use serde::Serialize;
use tracing::{info, warn};
use crate::aggregator::CourseProgressAggregator;
use crate::certificate::CertificateIssuer;
use crate::config::AcademyConfig;
use crate::eligibility::{Eligibility, EligibilityChecker};
use crate::error::{ProgressError, Result};
use crate::tracker::ProgressTracker;

/// What a playback tick led to.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// The tick completed the lecture for the first time
    pub lecture_completed: bool,
    /// Course progress after the tick
    pub course_progress: CourseProgress,
    /// Certificate issued because the course was completed
    pub certificate: Option<Certificate>,
}

/// Runs the learning rules for one learner and persists the results.
///
/// ```text
/// tick → track lecture → aggregate course → check eligibility → issue certificate
/// ```
pub struct LearningService<S: Storage> {
    storage: S,
    catalog: Catalog,
    learner: Learner,
    state: LearningState,
    config: AcademyConfig,
    tracker: ProgressTracker,
    aggregator: CourseProgressAggregator,
    checker: EligibilityChecker,
    issuer: CertificateIssuer,
}

impl<S: Storage> LearningService<S> {
    /// Create a service with an empty state and default configuration.
    pub fn new(storage: S, catalog: Catalog, learner: Learner) -> Self {
        let mut service = Self {
            storage,
            catalog,
            learner,
            state: LearningState::default(),
            config: AcademyConfig::default(),
            tracker: ProgressTracker::default(),
            aggregator: CourseProgressAggregator::new(),
            checker: EligibilityChecker::default(),
            issuer: CertificateIssuer::default(),
        };
        service.apply_config();
        service
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: AcademyConfig) -> Self {
        self.config = config;
        self.apply_config();
        self
    }

    fn apply_config(&mut self) {
        self.tracker = ProgressTracker::new(self.config.completion_threshold);
        self.checker = EligibilityChecker::new(self.config.requirements.clone());
        self.issuer = CertificateIssuer::new(self.config.requirements.clone())
            .with_template(self.config.template_type);
    }

    /// Restore the saved state. Starts empty when nothing was saved.
    pub async fn load(&mut self) -> Result<()> {
        self.state = self.storage.load_state().await?.unwrap_or_default();
        info!(
            "Loaded {} enrollments and {} certificates",
            self.state.enrolled_courses.len(),
            self.state.certificates.len()
        );
        Ok(())
    }

    /// The learner this service acts for.
    pub fn learner(&self) -> &Learner {
        &self.learner
    }

    /// The course catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration in use.
    pub fn config(&self) -> &AcademyConfig {
        &self.config
    }

    /// The full session state.
    pub fn state(&self) -> &LearningState {
        &self.state
    }

    /// Enroll the learner in a course.
    pub async fn enroll(&mut self, course_id: &CourseId) -> Result<CourseProgress> {
        let course = self.course(course_id)?;
        if self.state.enrollment(&self.learner.id, course_id).is_some() {
            return Err(ProgressError::AlreadyEnrolled(course_id.clone()));
        }

        let progress = CourseProgress::enrolled(
            self.learner.id.clone(),
            course_id.clone(),
            self.catalog.lecture_total(course),
            self.catalog.total_duration(course_id),
            Utc::now(),
        );
        self.state.enrolled_courses.push(progress.clone());
        info!("{} enrolled in course {}", self.learner.id, course_id);

        self.persist().await;
        Ok(progress)
    }

    /// Record a playback position reported by the player.
    pub async fn record_tick(
        &mut self,
        course_id: &CourseId,
        lecture_id: &LectureId,
        current_time: f64,
        total_time: f64,
    ) -> Result<TickReport> {
        let course = self.course(course_id)?.clone();
        self.lecture(course_id, lecture_id)?;
        if self.state.enrollment(&self.learner.id, course_id).is_none() {
            return Err(ProgressError::NotEnrolled(course_id.clone()));
        }

        let now = Utc::now();
        let outcome = self.tracker.record_tick(
            &mut self.state,
            &self.learner.id,
            course_id,
            lecture_id,
            current_time,
            total_time,
            now,
        )?;
        let course_progress =
            self.aggregator
                .recompute(&mut self.state, &self.catalog, &self.learner.id, &course, now);

        let certificate = if outcome.newly_completed
            && course_progress.is_completed
            && self.config.auto_issue
        {
            self.issuer
                .issue(&mut self.state, &self.learner, &course, &course_progress, now)
        } else {
            None
        };

        self.persist().await;
        Ok(TickReport {
            lecture_completed: outcome.newly_completed,
            course_progress,
            certificate,
        })
    }

    /// Record that the player reached the end of a lecture.
    pub async fn record_ended(
        &mut self,
        course_id: &CourseId,
        lecture_id: &LectureId,
    ) -> Result<TickReport> {
        let duration = self.lecture(course_id, lecture_id)?.duration_secs;
        self.record_tick(course_id, lecture_id, duration, duration).await
    }

    /// Progress of the learner on a course.
    pub fn course_progress(&self, course_id: &CourseId) -> Option<&CourseProgress> {
        self.state.enrollment(&self.learner.id, course_id)
    }

    /// All enrollments of the learner.
    pub fn enrolled_courses(&self) -> Vec<&CourseProgress> {
        self.state
            .enrolled_courses
            .iter()
            .filter(|p| p.user_id == self.learner.id)
            .collect()
    }

    /// All certificates of the learner, revoked ones included.
    pub fn certificates(&self) -> Vec<&Certificate> {
        self.state
            .certificates
            .iter()
            .filter(|c| c.user_id == self.learner.id)
            .collect()
    }

    /// Check whether the learner may receive a certificate for a course.
    ///
    /// Progress is recomputed against the current catalog first.
    pub async fn check_eligibility(&mut self, course_id: &CourseId) -> Result<Eligibility> {
        let course = self.course(course_id)?.clone();
        let progress = self.refresh_progress(&course).await?;
        Ok(self.checker.check(&progress, &course))
    }

    /// Issue a certificate for a course on request.
    ///
    /// `Ok(None)` means the course offers no certificate or the learner is
    /// not eligible yet.
    pub async fn issue_certificate(&mut self, course_id: &CourseId) -> Result<Option<Certificate>> {
        let course = self.course(course_id)?.clone();
        let progress = self.refresh_progress(&course).await?;

        let before = self.state.certificates.len();
        let certificate =
            self.issuer
                .issue(&mut self.state, &self.learner, &course, &progress, Utc::now());
        if self.state.certificates.len() != before {
            self.persist().await;
        }
        Ok(certificate)
    }

    /// Recompute stored progress against the current catalog. Saves only
    /// when the figures moved; reading does not count as an access.
    async fn refresh_progress(&mut self, course: &Course) -> Result<CourseProgress> {
        let before = self
            .course_progress(&course.id)
            .cloned()
            .ok_or_else(|| ProgressError::NotEnrolled(course.id.clone()))?;

        let mut progress =
            self.aggregator
                .recompute(&mut self.state, &self.catalog, &self.learner.id, course, Utc::now());
        progress.last_accessed_at = before.last_accessed_at;
        if let Some(stored) = self.state.enrollment_mut(&self.learner.id, &course.id) {
            stored.last_accessed_at = before.last_accessed_at;
        }

        if progress != before {
            info!(
                "Progress on course {} changed to {}/{} against the catalog",
                course.id, progress.completed_lectures, progress.total_lectures
            );
            self.persist().await;
        }
        Ok(progress)
    }

    /// Revoke one of the learner's certificates by number.
    pub async fn revoke_certificate(&mut self, certificate_number: &str) -> Result<Option<Certificate>> {
        let owned = self
            .certificates()
            .iter()
            .any(|c| c.certificate_number == certificate_number);
        if !owned {
            return Ok(None);
        }
        let certificate = self.issuer.revoke(&mut self.state, certificate_number);
        self.persist().await;
        Ok(certificate)
    }

    fn course(&self, course_id: &CourseId) -> Result<&Course> {
        self.catalog
            .course(course_id)
            .ok_or_else(|| ProgressError::UnknownCourse(course_id.clone()))
    }

    fn lecture(&self, course_id: &CourseId, lecture_id: &LectureId) -> Result<&Lecture> {
        self.catalog
            .lecture(lecture_id)
            .filter(|l| &l.course_id == course_id)
            .ok_or_else(|| ProgressError::UnknownLecture {
                course: course_id.clone(),
                lecture: lecture_id.clone(),
            })
    }

    /// Save the state; failures are logged and otherwise ignored.
    async fn persist(&mut self) {
        if let Err(e) = self.storage.save_state(&self.state).await {
            warn!("Failed to save learning state: {}", e);
        }
    }
}
