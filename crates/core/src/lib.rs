//! Cyber Academy core data models.
//!
//! This crate defines the catalog, progress and certificate records shared
//! by the learning service and its storage backends.

#![warn(missing_docs)]

// Identities
mod id;

// Catalog
mod course;

// Learning
mod progress;
mod requirements;
mod certificate;
mod state;

// Re-exports
pub use id::*;

pub use course::{Catalog, Course, CourseLevel, Lecture, Learner};
pub use progress::{CourseProgress, WatchProgress};
pub use requirements::CompletionRequirements;
pub use certificate::{format_study_time, Certificate, CertificateStatus, TemplateType};
pub use state::LearningState;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
