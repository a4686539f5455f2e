//! Course catalog model - immutable reference data.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, LectureId, UserId};

/// A course offered by the academy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,

    /// Course title
    pub title: String,

    /// Instructor display name
    #[serde(default)]
    pub instructor: String,

    /// Catalog category
    #[serde(default)]
    pub category: String,

    /// Difficulty level
    #[serde(default)]
    pub level: CourseLevel,

    /// Nominal course length in hours
    #[serde(default)]
    pub duration_hours: f64,

    /// Stored lecture total, used when the catalog carries no lecture list
    pub lecture_count: u32,

    /// Whether the course includes a quiz
    #[serde(default)]
    pub has_quiz: bool,

    /// Whether completing the course earns a certificate
    #[serde(default)]
    pub has_certificate: bool,
}

impl Course {
    /// Create a course with the given stored lecture total.
    pub fn new(id: impl Into<CourseId>, title: impl Into<String>, lecture_count: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            instructor: String::new(),
            category: String::new(),
            level: CourseLevel::default(),
            duration_hours: 0.0,
            lecture_count,
            has_quiz: false,
            has_certificate: false,
        }
    }
}

/// Course difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    /// No prior knowledge assumed
    #[default]
    Beginner,
    /// Builds on the fundamentals
    Intermediate,
    /// Hands-on depth for practitioners
    Advanced,
}

/// A single video lecture of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    /// Unique identifier
    pub id: LectureId,

    /// Parent course
    pub course_id: CourseId,

    /// Lecture title
    #[serde(default)]
    pub title: String,

    /// Video length in seconds
    pub duration_secs: f64,

    /// Position within the course
    pub order: u32,
}

/// The learner a session acts on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    /// Account identifier
    pub id: UserId,

    /// Name printed on certificates
    pub name: String,
}

impl Learner {
    /// Create a learner.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Courses and their lectures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// All courses
    pub courses: Vec<Course>,

    /// All lectures, for every course
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

impl Catalog {
    /// Look up a course.
    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| &c.id == id)
    }

    /// Look up a lecture.
    pub fn lecture(&self, id: &LectureId) -> Option<&Lecture> {
        self.lectures.iter().find(|l| &l.id == id)
    }

    /// Lectures of a course, in playback order.
    pub fn lectures_for(&self, course_id: &CourseId) -> Vec<&Lecture> {
        let mut lectures: Vec<&Lecture> = self
            .lectures
            .iter()
            .filter(|l| &l.course_id == course_id)
            .collect();
        lectures.sort_by_key(|l| l.order);
        lectures
    }

    /// Number of lectures that make up a course.
    ///
    /// Counts the lecture list when the catalog has one for the course and
    /// falls back to the course's stored total otherwise.
    pub fn lecture_total(&self, course: &Course) -> u32 {
        let listed = self.lectures.iter().filter(|l| l.course_id == course.id).count();
        if listed > 0 {
            listed as u32
        } else {
            course.lecture_count
        }
    }

    /// Sum of lecture durations of a course, in seconds.
    pub fn total_duration(&self, course_id: &CourseId) -> f64 {
        self.lectures
            .iter()
            .filter(|l| &l.course_id == course_id)
            .map(|l| l.duration_secs)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(id: &str, course: &str, order: u32) -> Lecture {
        Lecture {
            id: LectureId::new(id),
            course_id: CourseId::new(course),
            title: String::new(),
            duration_secs: 600.0,
            order,
        }
    }

    #[test]
    fn test_lecture_total_prefers_listed_lectures() {
        let catalog = Catalog {
            courses: vec![Course::new("c1", "Network Security", 10)],
            lectures: vec![lecture("l1", "c1", 1), lecture("l2", "c1", 2), lecture("x", "c2", 1)],
        };
        let course = catalog.course(&CourseId::new("c1")).unwrap();
        assert_eq!(catalog.lecture_total(course), 2);
        assert_eq!(catalog.total_duration(&course.id), 1200.0);
    }

    #[test]
    fn test_lecture_total_falls_back_to_stored_count() {
        let catalog = Catalog {
            courses: vec![Course::new("c1", "Network Security", 10)],
            lectures: vec![],
        };
        let course = catalog.course(&CourseId::new("c1")).unwrap();
        assert_eq!(catalog.lecture_total(course), 10);
    }

    #[test]
    fn test_lectures_for_sorted_by_order() {
        let catalog = Catalog {
            courses: vec![],
            lectures: vec![lecture("b", "c1", 2), lecture("a", "c1", 1)],
        };
        let ids: Vec<_> = catalog
            .lectures_for(&CourseId::new("c1"))
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_catalog_deserializes_with_defaults() {
        let json = r#"{
            "courses": [{"id": "7", "title": "Forensics", "lecture_count": 4, "has_certificate": true}]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let course = &catalog.courses[0];
        assert!(course.has_certificate);
        assert!(!course.has_quiz);
        assert_eq!(course.level, CourseLevel::Beginner);
        assert!(catalog.lectures.is_empty());
    }
}
