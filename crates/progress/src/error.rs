//! Errors raised by the learning service.

use academy_core::{CourseId, LectureId};
use academy_storage::StorageError;

/// Result type for learning operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Contract violations of learning operations.
///
/// Rule outcomes (not yet eligible, no certificate) are not errors; they are
/// reported through return values.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The player reported a non-positive or non-finite video length
    #[error("Invalid video length: {0}")]
    InvalidDuration(f64),

    /// Course missing from the catalog
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    /// Lecture missing from the catalog or not part of the course
    #[error("Unknown lecture {lecture} in course {course}")]
    UnknownLecture {
        /// Course that was asked for
        course: CourseId,
        /// Lecture that was asked for
        lecture: LectureId,
    },

    /// Learner is not enrolled in the course
    #[error("Not enrolled in course {0}")]
    NotEnrolled(CourseId),

    /// Learner is already enrolled in the course
    #[error("Already enrolled in course {0}")]
    AlreadyEnrolled(CourseId),

    /// Configuration could not be read
    #[error("Config error: {0}")]
    Config(String),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}
