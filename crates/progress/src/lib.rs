//! Learning progress and certificates.
//!
//! Lecture watch tracking, course roll-up, eligibility checks and
//! certificate issuance, wired together by [`LearningService`].

#![warn(missing_docs)]

pub mod error;
pub mod config;
pub mod tracker;
pub mod aggregator;
pub mod eligibility;
pub mod certificate;
pub mod service;

pub use error::{ProgressError, Result};
pub use config::{AcademyConfig, DEFAULT_COMPLETION_THRESHOLD};
pub use tracker::{ProgressTracker, TickOutcome};
pub use aggregator::{progress_percentage, CourseProgressAggregator};
pub use eligibility::{check_eligibility, Eligibility, EligibilityChecker, MissingRequirement};
pub use certificate::{can_issue_certificate, generate_certificate_number, CertificateIssuer};
pub use service::{LearningService, TickReport};
