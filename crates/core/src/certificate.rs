//! Certificate records.

use serde::{Deserialize, Serialize};
use crate::id::{CertificateId, CourseId, UserId};
use crate::Time;

/// A course completion certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Unique identifier
    pub id: CertificateId,

    /// Holder
    pub user_id: UserId,

    /// Completed course
    pub course_id: CourseId,

    /// Course title at issuance
    pub course_name: String,

    /// Holder name at issuance
    pub user_name: String,

    /// Instructor name at issuance
    pub instructor_name: String,

    /// Printed number, `TOM-YYYYMM-UUUUCCCC-XXXX`
    pub certificate_number: String,

    /// When the certificate was issued
    pub issued_at: Time,

    /// When the course was completed
    pub completion_date: Time,

    /// Course length in hours
    pub total_hours: f64,

    /// Layout used when rendering
    pub template_type: TemplateType,

    /// Validity
    pub status: CertificateStatus,
}

impl Certificate {
    /// Whether the certificate is still valid.
    pub fn is_active(&self) -> bool {
        self.status == CertificateStatus::Active
    }
}

/// Certificate validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Valid certificate
    Active,
    /// Withdrawn certificate
    Revoked,
}

impl CertificateStatus {
    /// Label shown next to the certificate.
    pub fn label(&self) -> &'static str {
        match self {
            CertificateStatus::Active => "Valid",
            CertificateStatus::Revoked => "Revoked",
        }
    }
}

/// Certificate layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    /// Standard layout
    #[default]
    Basic,
    /// Decorated layout
    Premium,
    /// Layout carrying the issuer's credentials
    Professional,
}

impl TemplateType {
    /// Human readable description of the layout.
    pub fn description(&self) -> &'static str {
        match self {
            TemplateType::Basic => "Basic certificate",
            TemplateType::Premium => "Premium certificate",
            TemplateType::Professional => "Professional certificate",
        }
    }
}

/// Format a study time in seconds as `"{h}h {m}m"`, or `"{m}m"` under an hour.
pub fn format_study_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
