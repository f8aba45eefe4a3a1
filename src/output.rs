//! Console rendering for the portal's CLI pages.

use crate::auth::User;
use crate::store::applications::{Application, ApplicationStatus};
use crate::store::jobs::{Job, JobStatistics};
use colored::Colorize;
use std::collections::BTreeMap;

pub fn job_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<28} {:<18} {:<14} {:<14} {:<8}\n",
        "ID", "TITLE", "COMPANY", "LOCATION", "SALARY", "STATUS"
    ));
    out.push_str(&format!("{}\n", "-".repeat(104)));
    for job in jobs {
        out.push_str(&format!(
            "{:<20} {:<28} {:<18} {:<14} {:<14} {:<8}\n",
            truncate(&job.id, 18),
            truncate(&job.title, 26),
            truncate(&job.company, 16),
            truncate(&job.location, 12),
            truncate(&job.salary_range, 12),
            job.status
        ));
    }
    out
}

pub fn job_details(job: &Job) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", job.title.bold()));
    out.push_str(&format!("Company:  {}\n", job.company));
    out.push_str(&format!("Location: {}\n", job.location));
    out.push_str(&format!("Salary:   {}\n", job.salary_range));
    out.push_str(&format!("Type:     {}\n", job.job_type));
    out.push_str(&format!("Posted:   {}\n", job.posted_date));
    out.push_str(&format!("Deadline: {}\n", job.deadline));
    out.push_str(&format!("Status:   {}\n", job.status));
    out.push_str(&format!("Skills:   {}\n", job.skills));
    out.push_str(&format!("\n{}\n", job.description));
    out
}

pub fn application_table(applications: &[Application]) -> String {
    if applications.is_empty() {
        return "No applications found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<20} {:<16} {:<20} {:<14}\n",
        "ID", "JOB", "USER", "APPLIED", "STATUS"
    ));
    out.push_str(&format!("{}\n", "-".repeat(92)));
    for application in applications {
        out.push_str(&format!(
            "{:<20} {:<20} {:<16} {:<20} {}\n",
            truncate(&application.id, 18),
            truncate(&application.job_id, 18),
            truncate(&application.user_id, 14),
            truncate(&application.applied_date, 18),
            status_badge(application.status)
        ));
    }
    out
}

pub fn status_badge(status: ApplicationStatus) -> String {
    let label = status.to_string();
    match status {
        ApplicationStatus::Accepted => label.green().to_string(),
        ApplicationStatus::Shortlisted => label.cyan().to_string(),
        ApplicationStatus::UnderReview => label.yellow().to_string(),
        ApplicationStatus::Rejected => label.red().to_string(),
        ApplicationStatus::Withdrawn => label.dimmed().to_string(),
        ApplicationStatus::Pending => label,
    }
}

pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<26} {:<8} {:<20} {:<18}\n",
        "ID", "EMAIL", "ROLE", "NAME", "LAST LOGIN"
    ));
    out.push_str(&format!("{}\n", "-".repeat(94)));
    for user in users {
        out.push_str(&format!(
            "{:<20} {:<26} {:<8} {:<20} {:<18}\n",
            truncate(&user.user_id, 18),
            truncate(&user.email, 24),
            user.role,
            truncate(&user.name, 18),
            truncate(&user.last_login, 16)
        ));
    }
    out
}

pub fn job_statistics(stats: &JobStatistics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Active jobs:      {}\n", stats.active_jobs));
    out.push_str(&format!("Companies:        {}\n", stats.companies));
    out.push_str(&format!("Posted this week: {}\n", stats.recent_jobs));
    match stats.average_salary {
        Some(avg) => out.push_str(&format!("Average salary:   {:.1} LPA\n", avg)),
        None => out.push_str("Average salary:   n/a\n"),
    }
    out
}

pub fn application_statistics(counts: &BTreeMap<ApplicationStatus, usize>) -> String {
    if counts.is_empty() {
        return "No applications yet.".to_string();
    }
    let mut out = String::new();
    for (status, count) in counts {
        out.push_str(&format!("{:<14} {}\n", format!("{}:", status), count));
    }
    out
}

pub fn suggestions(lines: &str) -> String {
    lines
        .lines()
        .map(|line| format!("  {} {}", "→".cyan(), line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::jobs::JobStatus;

    fn job() -> Job {
        Job {
            id: "JOB_1".to_string(),
            title: "Software Engineer".to_string(),
            company: "Google".to_string(),
            location: "Bangalore".to_string(),
            salary_range: "30-60 LPA".to_string(),
            job_type: "Full-time".to_string(),
            posted_date: "2026-08-01".to_string(),
            deadline: "2026-09-01".to_string(),
            description: "Build things.".to_string(),
            skills: "Python, SQL".to_string(),
            status: JobStatus::Open,
        }
    }

    #[test]
    fn test_job_table_lists_rows() {
        let rendered = job_table(&[job()]);
        assert!(rendered.contains("Software Engineer"));
        assert!(rendered.contains("Google"));

        assert_eq!(job_table(&[]), "No jobs found.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long value", 10), "a very ...");
    }

    #[test]
    fn test_suggestions_indented() {
        let rendered = suggestions("one\ntwo");
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("one"));
    }
}
