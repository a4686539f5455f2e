//! Certificate eligibility rules.

use std::fmt;
use academy_core::{CompletionRequirements, Course, CourseProgress};
use serde::Serialize;

/// A completion requirement the learner has not met yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingRequirement {
    /// Progress percentage below the minimum
    Progress {
        /// Required percentage
        required: u8,
        /// Current percentage
        current: u8,
    },
    /// Not every lecture completed
    AllLectures {
        /// Completed lectures
        completed: u32,
        /// Lectures in the course
        total: u32,
    },
    /// Quiz not passed
    Quiz {
        /// Minimum score
        min_score: u32,
    },
    /// Not enough watched time
    StudyHours {
        /// Required hours
        required: f64,
        /// Watched hours
        current: f64,
    },
}

impl fmt::Display for MissingRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRequirement::Progress { required, current } => write!(
                f,
                "Progress of at least {}% required (current: {}%)",
                required, current
            ),
            MissingRequirement::AllLectures { completed, total } => write!(
                f,
                "All lectures must be completed ({}/{})",
                completed, total
            ),
            MissingRequirement::Quiz { min_score } => {
                write!(f, "Quiz score of at least {} required", min_score)
            }
            MissingRequirement::StudyHours { required, current } => write!(
                f,
                "At least {} study hours required (current: {:.1})",
                required, current
            ),
        }
    }
}

/// Eligibility verdict for a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eligibility {
    /// Every requirement not met, in check order
    pub missing_requirements: Vec<MissingRequirement>,
    /// Progress percentage the verdict was computed from
    pub completion_rate: u8,
}

impl Eligibility {
    /// Whether every requirement is met.
    pub fn is_eligible(&self) -> bool {
        self.missing_requirements.is_empty()
    }

    /// Human readable reasons, one per missing requirement.
    pub fn messages(&self) -> Vec<String> {
        self.missing_requirements.iter().map(ToString::to_string).collect()
    }
}

/// Check course progress against a completion policy.
///
/// All checks run so the caller gets the full list of what is missing.
pub fn check_eligibility(
    progress: &CourseProgress,
    course: &Course,
    requirements: &CompletionRequirements,
) -> Eligibility {
    let mut missing = Vec::new();

    if progress.progress_percentage < requirements.min_progress_percentage {
        missing.push(MissingRequirement::Progress {
            required: requirements.min_progress_percentage,
            current: progress.progress_percentage,
        });
    }

    if progress.completed_lectures != progress.total_lectures {
        missing.push(MissingRequirement::AllLectures {
            completed: progress.completed_lectures,
            total: progress.total_lectures,
        });
    }

    // No quiz results are tracked; a fully watched course counts as passed.
    if let Some(min_score) = requirements.min_quiz_score.filter(|s| *s > 0) {
        if course.has_quiz && progress.progress_percentage < 100 {
            missing.push(MissingRequirement::Quiz { min_score });
        }
    }

    if let Some(required) = requirements.min_study_hours.filter(|h| *h > 0.0) {
        let current = progress.watched_duration / 3600.0;
        if current < required {
            missing.push(MissingRequirement::StudyHours { required, current });
        }
    }

    Eligibility {
        missing_requirements: missing,
        completion_rate: progress.progress_percentage,
    }
}

/// Checks progress against a fixed policy.
#[derive(Debug, Clone, Default)]
pub struct EligibilityChecker {
    requirements: CompletionRequirements,
}

impl EligibilityChecker {
    /// Create a checker for a policy.
    pub fn new(requirements: CompletionRequirements) -> Self {
        Self { requirements }
    }

    /// The policy in use.
    pub fn requirements(&self) -> &CompletionRequirements {
        &self.requirements
    }

    /// Check a learner's progress on a course.
    pub fn check(&self, progress: &CourseProgress, course: &Course) -> Eligibility {
        check_eligibility(progress, course, &self.requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::{CourseId, UserId};
    use chrono::Utc;

    fn progress(completed: u32, total: u32, percentage: u8) -> CourseProgress {
        let mut p = CourseProgress::enrolled(
            UserId::new("u1"),
            CourseId::new("c1"),
            total,
            3600.0,
            Utc::now(),
        );
        p.completed_lectures = completed;
        p.progress_percentage = percentage;
        p
    }

    #[test]
    fn test_complete_course_is_eligible() {
        let mut course = Course::new("c1", "Cryptography", 10);
        course.has_quiz = true;
        let result = check_eligibility(&progress(10, 10, 100), &course, &Default::default());
        assert!(result.is_eligible());
        assert!(result.messages().is_empty());
        assert_eq!(result.completion_rate, 100);
    }

    #[test]
    fn test_all_failures_reported() {
        let mut course = Course::new("c1", "Cryptography", 10);
        course.has_quiz = true;
        let result = check_eligibility(&progress(5, 10, 50), &course, &Default::default());
        assert!(!result.is_eligible());
        assert_eq!(
            result.missing_requirements,
            vec![
                MissingRequirement::Progress { required: 80, current: 50 },
                MissingRequirement::AllLectures { completed: 5, total: 10 },
                MissingRequirement::Quiz { min_score: 60 },
            ]
        );
        assert_eq!(
            result.messages()[0],
            "Progress of at least 80% required (current: 50%)"
        );
        assert_eq!(result.messages()[1], "All lectures must be completed (5/10)");
    }

    #[test]
    fn test_percentage_met_but_lectures_missing() {
        let course = Course::new("c1", "Cryptography", 10);
        let result = check_eligibility(&progress(9, 10, 90), &course, &Default::default());
        assert_eq!(
            result.missing_requirements,
            vec![MissingRequirement::AllLectures { completed: 9, total: 10 }]
        );
    }

    #[test]
    fn test_quiz_check_skipped_without_quiz_or_score() {
        let course = Course::new("c1", "Cryptography", 10);
        let policy = CompletionRequirements {
            min_progress_percentage: 50,
            ..Default::default()
        };
        // No quiz on the course.
        let result = check_eligibility(&progress(10, 10, 90), &course, &policy);
        assert!(result.is_eligible());

        let mut quiz_course = course.clone();
        quiz_course.has_quiz = true;
        let no_score = CompletionRequirements {
            min_quiz_score: Some(0),
            ..policy.clone()
        };
        assert!(check_eligibility(&progress(10, 10, 90), &quiz_course, &no_score).is_eligible());
        assert!(!check_eligibility(&progress(10, 10, 90), &quiz_course, &policy).is_eligible());
    }

    #[test]
    fn test_study_hours() {
        let course = Course::new("c1", "Cryptography", 10);
        let policy = CompletionRequirements {
            min_study_hours: Some(2.0),
            ..Default::default()
        };
        let mut p = progress(10, 10, 100);
        p.watched_duration = 3600.0;
        let result = EligibilityChecker::new(policy.clone()).check(&p, &course);
        assert_eq!(
            result.missing_requirements,
            vec![MissingRequirement::StudyHours { required: 2.0, current: 1.0 }]
        );

        p.watched_duration = 7200.0;
        assert!(EligibilityChecker::new(policy).check(&p, &course).is_eligible());
    }

    #[test]
    fn test_verdict_consistent_with_missing_list() {
        let mut course = Course::new("c1", "Cryptography", 10);
        course.has_quiz = true;
        for completed in 0..=10 {
            let pct = (completed * 10) as u8;
            let result = check_eligibility(&progress(completed, 10, pct), &course, &Default::default());
            assert_eq!(result.is_eligible(), result.missing_requirements.is_empty());
            assert_eq!(result.is_eligible(), completed == 10);
        }
    }
}
