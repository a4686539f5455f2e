//! Learning progress records.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, LectureId, UserId};
use crate::Time;

/// Playback progress of one learner on one lecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchProgress {
    /// Learner
    pub user_id: UserId,

    /// Course the lecture belongs to
    pub course_id: CourseId,

    /// Lecture
    pub lecture_id: LectureId,

    /// Last reported playback position (seconds)
    pub current_time: f64,

    /// Video length reported by the player (seconds)
    pub total_time: f64,

    /// Furthest position ever reached (seconds)
    #[serde(default)]
    pub furthest_time: f64,

    /// Last playback tick
    pub last_watched_at: Time,

    /// First time the completion threshold was reached. Never cleared.
    pub completed_at: Option<Time>,
}

impl WatchProgress {
    /// Start tracking a lecture.
    pub fn new(user_id: UserId, course_id: CourseId, lecture_id: LectureId, now: Time) -> Self {
        Self {
            user_id,
            course_id,
            lecture_id,
            current_time: 0.0,
            total_time: 0.0,
            furthest_time: 0.0,
            last_watched_at: now,
            completed_at: None,
        }
    }

    /// Ratio of the current position to the video length.
    pub fn watch_ratio(&self) -> f64 {
        if self.total_time > 0.0 {
            self.current_time / self.total_time
        } else {
            0.0
        }
    }

    /// Whether the lecture has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Aggregate progress of one learner on one course.
///
/// Derived from [`WatchProgress`] records; never edited on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Course
    pub course_id: CourseId,

    /// Learner
    pub user_id: UserId,

    /// When the learner enrolled
    pub enrolled_at: Time,

    /// Lectures that make up the course
    pub total_lectures: u32,

    /// Lectures completed so far
    pub completed_lectures: u32,

    /// Total video length (seconds)
    pub total_duration: f64,

    /// Watched video length (seconds)
    pub watched_duration: f64,

    /// Rounded completion share, 0-100
    pub progress_percentage: u8,

    /// Last time the learner touched the course
    pub last_accessed_at: Time,

    /// All lectures completed
    pub is_completed: bool,

    /// First time the course reached 100%
    pub completed_at: Option<Time>,
}

impl CourseProgress {
    /// A fresh enrollment with nothing watched yet.
    pub fn enrolled(
        user_id: UserId,
        course_id: CourseId,
        total_lectures: u32,
        total_duration: f64,
        now: Time,
    ) -> Self {
        Self {
            course_id,
            user_id,
            enrolled_at: now,
            total_lectures,
            completed_lectures: 0,
            total_duration,
            watched_duration: 0.0,
            progress_percentage: 0,
            last_accessed_at: now,
            is_completed: false,
            completed_at: None,
        }
    }
}
