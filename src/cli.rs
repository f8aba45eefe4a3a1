//! CLI interface for the placement portal

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "placement-portal")]
#[command(about = "University placement portal with an AI placement assistant")]
#[command(
    long_about = "Browse job postings, track applications, administer the portal, and talk to the AI placement assistant"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize data files and seed the default accounts
    Init,

    /// Register a student account
    Register {
        /// Email address (unique, case-insensitive)
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Department
        #[arg(short, long, default_value = "")]
        department: String,

        /// Year of study
        #[arg(short, long, default_value = "")]
        year: String,
    },

    /// Verify credentials
    Login {
        /// Email address
        email: String,
    },

    /// Browse job postings
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },

    /// Apply to a job
    Apply {
        /// Job identifier
        job_id: String,

        /// Email to authenticate as
        #[arg(short, long)]
        email: String,

        /// Resume file to attach (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Cover letter text
        #[arg(short, long)]
        cover_letter: Option<String>,
    },

    /// Track your applications
    Applications {
        #[command(subcommand)]
        action: ApplicationAction,
    },

    /// Administer the portal (admin role required)
    Admin {
        /// Admin email to authenticate as
        #[arg(short, long)]
        email: String,

        #[command(subcommand)]
        action: AdminAction,
    },

    /// Talk to the AI placement assistant
    Chat {
        /// Email to authenticate as (optional; preferences start empty)
        #[arg(short, long)]
        email: Option<String>,

        /// Resume file to preload into the session
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Preferred industry
        #[arg(short, long)]
        industry: Option<String>,

        /// Skills of interest (comma-separated)
        #[arg(short, long)]
        skills: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum JobAction {
    /// List jobs with optional filters
    List {
        /// Substring search over title, company, and skills
        #[arg(short, long)]
        query: Option<String>,

        /// Filter by job type
        #[arg(short, long)]
        job_type: Option<String>,

        /// Filter by location
        #[arg(short, long)]
        location: Option<String>,

        /// Minimum salary (parsed range must start at or above this)
        #[arg(long)]
        min_salary: Option<f64>,

        /// Maximum salary (parsed range must end at or below this)
        #[arg(long)]
        max_salary: Option<f64>,

        /// Sort order: recent, salary-desc, salary-asc
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show one job in full
    Show {
        /// Job identifier
        id: String,
    },

    /// Summary statistics over the posted jobs
    Stats,
}

#[derive(Subcommand)]
pub enum ApplicationAction {
    /// List your applications
    List {
        /// Email to authenticate as
        #[arg(short, long)]
        email: String,
    },

    /// Withdraw an application
    Withdraw {
        /// Application identifier
        id: String,

        /// Email to authenticate as
        #[arg(short, long)]
        email: String,

        /// Optional withdrawal reason
        #[arg(short, long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Post a new job
    AddJob {
        #[arg(long)]
        title: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        location: String,

        /// Free-text salary range, e.g. "30-60 LPA"
        #[arg(long)]
        salary: String,

        #[arg(long, default_value = "Full-time")]
        job_type: String,

        /// Application deadline (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        deadline: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated skills
        #[arg(long, default_value = "")]
        skills: String,
    },

    /// Close a job to further applications
    CloseJob {
        /// Job identifier
        id: String,
    },

    /// Remove a job posting
    RemoveJob {
        /// Job identifier
        id: String,
    },

    /// List every application
    Applications,

    /// Per-status application counts
    ApplicationStats,

    /// Change an application's status
    SetStatus {
        /// Application identifier
        id: String,

        /// New status (pending, under-review, shortlisted, accepted, rejected, withdrawn)
        status: String,
    },

    /// List user accounts
    Users,

    /// Remove a user account
    RemoveUser {
        /// User identifier
        id: String,
    },
}

/// Sort-order argument parsing for `jobs list`.
pub fn parse_sort_order(sort: &str) -> Result<crate::store::jobs::SortBy, String> {
    match sort.to_lowercase().as_str() {
        "recent" | "most-recent" => Ok(crate::store::jobs::SortBy::MostRecent),
        "salary-desc" | "salary-high" => Ok(crate::store::jobs::SortBy::SalaryHighToLow),
        "salary-asc" | "salary-low" => Ok(crate::store::jobs::SortBy::SalaryLowToHigh),
        _ => Err(format!(
            "Invalid sort order: {}. Supported: recent, salary-desc, salary-asc",
            sort
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::jobs::SortBy;

    #[test]
    fn test_parse_sort_order() {
        assert_eq!(parse_sort_order("recent").unwrap(), SortBy::MostRecent);
        assert_eq!(
            parse_sort_order("SALARY-DESC").unwrap(),
            SortBy::SalaryHighToLow
        );
        assert!(parse_sort_order("alphabetical").is_err());
    }
}
