//! Course completion policy.

use serde::{Deserialize, Serialize};

/// Conditions a learner must meet before a certificate can be issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRequirements {
    /// Minimum progress percentage (0-100)
    pub min_progress_percentage: u8,

    /// Minimum quiz score, for courses with a quiz. `None` or `0` disables the check.
    pub min_quiz_score: Option<u32>,

    /// Assignments that must be submitted
    pub required_assignments: Option<Vec<String>>,

    /// Minimum watched time, in hours
    pub min_study_hours: Option<f64>,
}

impl Default for CompletionRequirements {
    fn default() -> Self {
        Self {
            min_progress_percentage: 80,
            min_quiz_score: Some(60),
            required_assignments: None,
            min_study_hours: None,
        }
    }
}
