//! Job applications: submission, status tracking, and withdrawal.

use crate::error::Result;
use crate::store::table::{Record, Table};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Shortlisted,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "under review" | "under-review" | "review" => Ok(ApplicationStatus::UnderReview),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "withdrawn" => Ok(ApplicationStatus::Withdrawn),
            _ => Err(format!("unknown application status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    pub applied_date: String,
    pub resume_path: Option<String>,
    pub cover_letter: Option<String>,
    pub withdrawal_reason: Option<String>,
}

impl Record for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ApplicationManager {
    table: Table<Application>,
}

impl ApplicationManager {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let table = Table::open(&data_dir.join("applications.csv"))?;
        Ok(Self { table })
    }

    pub fn submit(
        &mut self,
        job_id: &str,
        user_id: &str,
        resume_path: Option<String>,
        cover_letter: Option<String>,
    ) -> Result<Application> {
        let application = Application {
            id: self.table.next_id("APP"),
            job_id: job_id.to_string(),
            user_id: user_id.to_string(),
            status: ApplicationStatus::Pending,
            applied_date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            resume_path,
            cover_letter,
            withdrawal_reason: None,
        };
        self.table.insert(application.clone())?;
        Ok(application)
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.table.get(id)
    }

    pub fn all(&self) -> &[Application] {
        self.table.rows()
    }

    /// Applications submitted by one user, most recent first.
    pub fn for_user(&self, user_id: &str) -> Vec<Application> {
        let mut applications: Vec<Application> = self
            .table
            .rows()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        applications
    }

    pub fn update_status(&mut self, id: &str, status: ApplicationStatus) -> Result<bool> {
        self.table.update(id, |application| {
            application.status = status;
        })
    }

    pub fn withdraw(&mut self, id: &str, reason: Option<&str>) -> Result<bool> {
        let reason = reason.map(str::to_string);
        self.table.update(id, |application| {
            application.status = ApplicationStatus::Withdrawn;
            application.withdrawal_reason = reason;
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.table.remove(id)?.is_some())
    }

    /// Count per status, restricted to one user when given.
    pub fn statistics(&self, user_id: Option<&str>) -> BTreeMap<ApplicationStatus, usize> {
        let mut counts = BTreeMap::new();
        for application in self.table.rows() {
            if let Some(user) = user_id {
                if application.user_id != user {
                    continue;
                }
            }
            *counts.entry(application.status).or_insert(0) += 1;
        }
        counts
    }
}
