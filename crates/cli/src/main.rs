//! Cyber Academy CLI - drive learning progress from the command line.

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use academy_core::{format_study_time, Certificate, CourseId, CourseProgress, LectureId, Learner};
use academy_progress::{AcademyConfig, LearningService};
use academy_storage::{load_catalog, JsonStorage};

#[derive(Parser)]
#[command(name = "academy")]
#[command(about = "Cyber Academy learning progress and certificates", long_about = None)]
struct Cli {
    /// Storage directory
    #[arg(long, default_value = ".academy")]
    data: PathBuf,
    /// Course catalog JSON file (default: <data>/catalog.json)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Learner id
    #[arg(long, default_value = "current-user")]
    user: String,
    /// Learner name printed on certificates
    #[arg(long, default_value = "Learner")]
    name: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog courses
    Courses,
    /// Enroll in a course
    Enroll {
        /// Course ID
        course: String,
    },
    /// Report a playback position
    Tick {
        /// Course ID
        course: String,
        /// Lecture ID
        lecture: String,
        /// Current position in seconds
        current: f64,
        /// Video length in seconds
        total: f64,
    },
    /// Report that a lecture played to the end
    Ended {
        /// Course ID
        course: String,
        /// Lecture ID
        lecture: String,
    },
    /// Show course progress
    Status {
        /// Only this course
        course: Option<String>,
    },
    /// Check certificate eligibility for a course
    Eligibility {
        /// Course ID
        course: String,
    },
    /// Issue a certificate for a completed course
    Issue {
        /// Course ID
        course: String,
    },
    /// Revoke a certificate
    Revoke {
        /// Certificate number
        number: String,
    },
    /// List certificates
    Certificates,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AcademyConfig::load(path).await?,
        None => AcademyConfig::default(),
    };
    let catalog_path = cli.catalog.clone().unwrap_or_else(|| cli.data.join("catalog.json"));
    let catalog = load_catalog(&catalog_path)
        .await
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let storage = JsonStorage::new(&cli.data).await?;

    let mut service = LearningService::new(storage, catalog, Learner::new(cli.user.as_str(), cli.name))
        .with_config(config);
    service.load().await?;

    match cli.command {
        Commands::Courses => {
            let catalog = service.catalog();
            println!("Courses ({})", catalog.courses.len());
            for course in &catalog.courses {
                println!(
                    "  {} | {} lectures | quiz: {} | certificate: {} - {}",
                    course.id,
                    catalog.lecture_total(course),
                    yes_no(course.has_quiz),
                    yes_no(course.has_certificate),
                    course.title,
                );
            }
        }
        Commands::Enroll { course } => {
            let progress = service.enroll(&CourseId::new(course)).await?;
            println!("Enrolled in {} ({} lectures)", progress.course_id, progress.total_lectures);
        }
        Commands::Tick { course, lecture, current, total } => {
            let report = service
                .record_tick(&CourseId::new(course), &LectureId::new(lecture), current, total)
                .await?;
            if report.lecture_completed {
                println!("Lecture completed");
            }
            print_progress(&report.course_progress);
            if let Some(cert) = report.certificate {
                print_certificate(&cert);
            }
        }
        Commands::Ended { course, lecture } => {
            let report = service
                .record_ended(&CourseId::new(course), &LectureId::new(lecture))
                .await?;
            print_progress(&report.course_progress);
            if let Some(cert) = report.certificate {
                print_certificate(&cert);
            }
        }
        Commands::Status { course } => {
            let enrolled = service.enrolled_courses();
            let filter = course.map(CourseId::new);
            let shown: Vec<_> = enrolled
                .into_iter()
                .filter(|p| filter.as_ref().map_or(true, |c| &p.course_id == c))
                .collect();
            if shown.is_empty() {
                println!("No enrollments");
            }
            for progress in shown {
                print_progress(progress);
            }
        }
        Commands::Eligibility { course } => {
            let eligibility = service.check_eligibility(&CourseId::new(course)).await?;
            if eligibility.is_eligible() {
                println!("Eligible ({}%)", eligibility.completion_rate);
            } else {
                println!("Cannot issue certificate yet ({}%)", eligibility.completion_rate);
                for message in eligibility.messages() {
                    println!("  - {}", message);
                }
            }
        }
        Commands::Issue { course } => {
            let course_id = CourseId::new(course);
            match service.issue_certificate(&course_id).await? {
                Some(cert) => print_certificate(&cert),
                None => {
                    println!("No certificate issued for {}", course_id);
                    if let Ok(eligibility) = service.check_eligibility(&course_id).await {
                        for message in eligibility.messages() {
                            println!("  - {}", message);
                        }
                    }
                }
            }
        }
        Commands::Revoke { number } => match service.revoke_certificate(&number).await? {
            Some(cert) => print_certificate(&cert),
            None => println!("Certificate not found"),
        },
        Commands::Certificates => {
            let certificates = service.certificates();
            println!("Certificates ({})", certificates.len());
            for cert in certificates {
                print_certificate(cert);
            }
        }
    }

    info!("Done");
    Ok(())
}

fn print_progress(progress: &CourseProgress) {
    println!(
        "  {} | {}% | {}/{} lectures | watched {} | {}",
        progress.course_id,
        progress.progress_percentage,
        progress.completed_lectures,
        progress.total_lectures,
        format_study_time(progress.watched_duration as u64),
        if progress.is_completed { "COMPLETED" } else { "IN PROGRESS" },
    );
}

fn print_certificate(cert: &Certificate) {
    println!(
        "  {} | {} | {} | {} | issued {}",
        cert.certificate_number,
        cert.status.label(),
        cert.template_type.description(),
        cert.course_name,
        cert.issued_at.format("%Y-%m-%d"),
    );
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
