//! Certificate issuance.

use academy_core::{
    Certificate, CertificateId, CertificateStatus, CompletionRequirements, Course, CourseProgress,
    LearningState, Learner, TemplateType, Time,
};
use rand::Rng;
use tracing::{debug, info};
use crate::eligibility::check_eligibility;

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Prefix of every certificate number.
pub const CERTIFICATE_PREFIX: &str = "TOM";

fn last4_upper(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect::<String>().to_uppercase()
}

/// Build a certificate number, `TOM-{YYYY}{MM}-{user}{course}-{suffix}`.
///
/// `user` and `course` are the last four characters of the ids and the
/// suffix is four random base36 characters, all uppercase.
pub fn generate_certificate_number<R: Rng>(
    user_id: &str,
    course_id: &str,
    issued_at: Time,
    rng: &mut R,
) -> String {
    let suffix: String = (0..4)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!(
        "{}-{}-{}{}-{}",
        CERTIFICATE_PREFIX,
        issued_at.format("%Y%m"),
        last4_upper(user_id),
        last4_upper(course_id),
        suffix
    )
}

/// Whether a certificate may be issued for this progress.
pub fn can_issue_certificate(
    course: &Course,
    progress: &CourseProgress,
    requirements: &CompletionRequirements,
) -> bool {
    course.has_certificate && check_eligibility(progress, course, requirements).is_eligible()
}

/// Issues certificates, at most one active per learner and course.
#[derive(Debug, Clone, Default)]
pub struct CertificateIssuer {
    requirements: CompletionRequirements,
    template_type: TemplateType,
}

impl CertificateIssuer {
    /// Create an issuer checking against `requirements`.
    pub fn new(requirements: CompletionRequirements) -> Self {
        Self {
            requirements,
            template_type: TemplateType::default(),
        }
    }

    /// Set the layout of issued certificates.
    pub fn with_template(mut self, template_type: TemplateType) -> Self {
        self.template_type = template_type;
        self
    }

    /// Issue a certificate for a completed course.
    ///
    /// Returns `None` when the course has no certificate or the learner is
    /// not eligible. When the learner already holds an active certificate
    /// for the course, that certificate is returned unchanged.
    pub fn issue(
        &self,
        state: &mut LearningState,
        learner: &Learner,
        course: &Course,
        progress: &CourseProgress,
        now: Time,
    ) -> Option<Certificate> {
        if !can_issue_certificate(course, progress, &self.requirements) {
            debug!("Course {} not eligible for a certificate for {}", course.id, learner.id);
            return None;
        }

        let (certificate, created) = state.insert_certificate_with(&learner.id, &course.id, || {
            Certificate {
                id: CertificateId::new(),
                user_id: learner.id.clone(),
                course_id: course.id.clone(),
                course_name: course.title.clone(),
                user_name: learner.name.clone(),
                instructor_name: course.instructor.clone(),
                certificate_number: generate_certificate_number(
                    learner.id.as_str(),
                    course.id.as_str(),
                    now,
                    &mut rand::thread_rng(),
                ),
                issued_at: now,
                completion_date: progress.completed_at.unwrap_or(now),
                total_hours: course.duration_hours,
                template_type: self.template_type,
                status: CertificateStatus::Active,
            }
        });

        if created {
            info!(
                "Issued certificate {} for course {} to {}",
                certificate.certificate_number, course.id, learner.id
            );
        }
        Some(certificate)
    }

    /// Revoke a certificate by number. Returns the certificate after the change.
    pub fn revoke(&self, state: &mut LearningState, certificate_number: &str) -> Option<Certificate> {
        let certificate = state.certificate_mut(certificate_number)?;
        if certificate.status == CertificateStatus::Active {
            certificate.status = CertificateStatus::Revoked;
            info!("Revoked certificate {}", certificate_number);
        }
        Some(certificate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::{CourseId, UserId};
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn certificate_course() -> Course {
        let mut course = Course::new("course-1234", "Incident Response", 10);
        course.has_certificate = true;
        course.has_quiz = true;
        course.instructor = "Park".to_string();
        course.duration_hours = 12.0;
        course
    }

    fn finished(course: &Course) -> CourseProgress {
        let mut p = CourseProgress::enrolled(
            UserId::new("user-abcd"),
            course.id.clone(),
            10,
            6000.0,
            Utc::now(),
        );
        p.completed_lectures = 10;
        p.progress_percentage = 100;
        p.is_completed = true;
        p.completed_at = Some(Utc::now());
        p
    }

    fn is_number_shaped(number: &str) -> bool {
        let parts: Vec<&str> = number.split('-').collect();
        parts.len() == 4
            && parts[0] == "TOM"
            && parts[1].len() == 6
            && parts[1].chars().all(|c| c.is_ascii_digit())
            && parts[2].len() == 8
            && parts[3].len() == 4
            && parts[3].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }

    #[test]
    fn test_certificate_number_format() {
        let issued = Utc.with_ymd_and_hms(2024, 8, 10, 15, 30, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let number = generate_certificate_number("user-abcd", "course-x1y2", issued, &mut rng);

        assert!(number.starts_with("TOM-202408-ABCDX1Y2-"), "{}", number);
        assert!(is_number_shaped(&number), "{}", number);
    }

    #[test]
    fn test_certificate_number_short_ids() {
        let issued = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
        let number = generate_certificate_number("u7", "2", issued, &mut rand::thread_rng());
        assert!(number.starts_with("TOM-202501-U72-"), "{}", number);
        assert_eq!(number.len(), "TOM-202501-U72-".len() + 4);
    }

    #[test]
    fn test_issue_creates_active_certificate() {
        let course = certificate_course();
        let learner = Learner::new("user-abcd", "Kim Minsu");
        let mut state = LearningState::default();

        let cert = CertificateIssuer::default()
            .issue(&mut state, &learner, &course, &finished(&course), Utc::now())
            .unwrap();
        assert_eq!(cert.status, CertificateStatus::Active);
        assert_eq!(cert.user_name, "Kim Minsu");
        assert_eq!(cert.instructor_name, "Park");
        assert_eq!(cert.total_hours, 12.0);
        assert!(is_number_shaped(&cert.certificate_number));
        assert_eq!(state.certificates.len(), 1);
    }

    #[test]
    fn test_issue_is_idempotent() {
        let course = certificate_course();
        let learner = Learner::new("user-abcd", "Kim Minsu");
        let progress = finished(&course);
        let mut state = LearningState::default();
        let issuer = CertificateIssuer::default();

        let first = issuer.issue(&mut state, &learner, &course, &progress, Utc::now()).unwrap();
        let second = issuer.issue(&mut state, &learner, &course, &progress, Utc::now()).unwrap();
        assert_eq!(first.certificate_number, second.certificate_number);
        assert_eq!(first.id, second.id);
        assert_eq!(state.certificates.len(), 1);
    }

    #[test]
    fn test_no_certificate_for_course_without_one() {
        let mut course = certificate_course();
        course.has_certificate = false;
        let mut state = LearningState::default();

        let cert = CertificateIssuer::default().issue(
            &mut state,
            &Learner::new("user-abcd", "Kim"),
            &course,
            &finished(&course),
            Utc::now(),
        );
        assert!(cert.is_none());
        assert!(state.certificates.is_empty());
    }

    #[test]
    fn test_no_certificate_when_not_eligible() {
        let course = certificate_course();
        let mut progress = finished(&course);
        progress.completed_lectures = 7;
        progress.progress_percentage = 70;
        let mut state = LearningState::default();

        assert!(!can_issue_certificate(&course, &progress, &Default::default()));
        let cert = CertificateIssuer::default().issue(
            &mut state,
            &Learner::new("user-abcd", "Kim"),
            &course,
            &progress,
            Utc::now(),
        );
        assert!(cert.is_none());
    }

    #[test]
    fn test_revoke_then_reissue() {
        let course = certificate_course();
        let learner = Learner::new("user-abcd", "Kim");
        let progress = finished(&course);
        let mut state = LearningState::default();
        let issuer = CertificateIssuer::default().with_template(TemplateType::Premium);

        let first = issuer.issue(&mut state, &learner, &course, &progress, Utc::now()).unwrap();
        assert_eq!(first.template_type, TemplateType::Premium);

        let revoked = issuer.revoke(&mut state, &first.certificate_number).unwrap();
        assert_eq!(revoked.status, CertificateStatus::Revoked);
        assert!(state.active_certificate(&learner.id, &CourseId::new("course-1234")).is_none());

        let second = issuer.issue(&mut state, &learner, &course, &progress, Utc::now()).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(state.certificates.len(), 2);
        assert!(issuer.revoke(&mut state, "TOM-000000-NONE-0000").is_none());
    }
}
