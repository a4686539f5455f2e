//! Lecture playback tracking.

use academy_core::{CourseId, LearningState, LectureId, Time, UserId};
use tracing::{debug, info};
use crate::config::DEFAULT_COMPLETION_THRESHOLD;
use crate::error::{ProgressError, Result};

/// What a playback tick changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Watch ratio after clamping the position
    pub watch_ratio: f64,
    /// This tick completed the lecture for the first time
    pub newly_completed: bool,
}

/// Records playback positions and marks lectures completed.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    threshold: f64,
}

impl ProgressTracker {
    /// Create a tracker completing lectures at the given watch ratio.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Watch ratio that completes a lecture.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Record a playback position.
    ///
    /// `current_time` is clamped to `[0, total_time]`. The first tick at or
    /// past the threshold stamps `completed_at`; later ticks never clear it.
    #[allow(clippy::too_many_arguments)]
    pub fn record_tick(
        &self,
        state: &mut LearningState,
        user_id: &UserId,
        course_id: &CourseId,
        lecture_id: &LectureId,
        current_time: f64,
        total_time: f64,
        now: Time,
    ) -> Result<TickOutcome> {
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(ProgressError::InvalidDuration(total_time));
        }
        let current_time = if current_time.is_nan() {
            0.0
        } else {
            current_time.clamp(0.0, total_time)
        };

        let watch = state.watch_entry(user_id, course_id, lecture_id, now);
        watch.current_time = current_time;
        watch.total_time = total_time;
        watch.furthest_time = watch.furthest_time.max(current_time).min(total_time);
        watch.last_watched_at = now;

        let watch_ratio = current_time / total_time;
        let newly_completed = watch_ratio >= self.threshold && watch.completed_at.is_none();
        if newly_completed {
            watch.completed_at = Some(now);
            info!("Lecture {} of course {} completed by {}", lecture_id, course_id, user_id);
        } else {
            debug!(
                "Tick {}/{}: {:.1}s of {:.1}s",
                course_id, lecture_id, current_time, total_time
            );
        }

        Ok(TickOutcome {
            watch_ratio,
            newly_completed,
        })
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLETION_THRESHOLD)
    }
}
