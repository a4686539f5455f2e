//! Course-level progress roll-up.

use std::collections::HashSet;
use academy_core::{Catalog, Course, CourseProgress, LearningState, LectureId, Time, UserId};
use tracing::info;

/// Rounded share of completed lectures, 0-100.
///
/// Halves round up. An empty course is at 0%.
pub fn progress_percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Recomputes [`CourseProgress`] from lecture progress records.
#[derive(Debug, Clone, Default)]
pub struct CourseProgressAggregator;

impl CourseProgressAggregator {
    /// Create an aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Recompute a learner's progress on a course and store it.
    ///
    /// The lecture total comes from the catalog at call time, and only
    /// lectures still listed there are counted. `completed_at`
    /// is stamped the first time the course reaches 100% and kept after.
    pub fn recompute(
        &self,
        state: &mut LearningState,
        catalog: &Catalog,
        user_id: &UserId,
        course: &Course,
        now: Time,
    ) -> CourseProgress {
        let total_lectures = catalog.lecture_total(course);
        let total_duration = catalog.total_duration(&course.id);

        // Records of lectures dropped from the catalog no longer count.
        let listed: HashSet<&LectureId> = catalog
            .lectures_for(&course.id)
            .into_iter()
            .map(|l| &l.id)
            .collect();
        let (completed, watched_duration) = state
            .watch_records(user_id, &course.id)
            .filter(|w| listed.is_empty() || listed.contains(&w.lecture_id))
            .fold((0u32, 0.0f64), |(done, watched), w| {
                (done + w.is_completed() as u32, watched + w.furthest_time)
            });
        let completed_lectures = completed.min(total_lectures);

        let index = match state
            .enrolled_courses
            .iter()
            .position(|p| &p.user_id == user_id && p.course_id == course.id)
        {
            Some(index) => index,
            None => {
                state.enrolled_courses.push(CourseProgress::enrolled(
                    user_id.clone(),
                    course.id.clone(),
                    total_lectures,
                    total_duration,
                    now,
                ));
                state.enrolled_courses.len() - 1
            }
        };
        let progress = &mut state.enrolled_courses[index];

        progress.total_lectures = total_lectures;
        progress.completed_lectures = completed_lectures;
        progress.total_duration = total_duration;
        progress.watched_duration = watched_duration;
        progress.progress_percentage = progress_percentage(completed_lectures, total_lectures);
        progress.is_completed = total_lectures > 0 && completed_lectures == total_lectures;
        progress.last_accessed_at = now;

        if progress.is_completed && progress.completed_at.is_none() {
            progress.completed_at = Some(now);
            info!("Course {} completed by {}", course.id, user_id);
        }

        progress.clone()
    }
}
