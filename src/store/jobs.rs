//! Job postings: browse, search, and admin maintenance.

use crate::error::Result;
use crate::store::table::{Record, Table};
use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Closed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Open => write!(f, "Open"),
            JobStatus::Closed => write!(f, "Closed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free text, e.g. "30-60 LPA". Numeric bounds are recovered from
    /// the first and last digit runs.
    pub salary_range: String,
    pub job_type: String,
    pub posted_date: String,
    pub deadline: String,
    pub description: String,
    /// Comma-separated skill list.
    pub skills: String,
    pub status: JobStatus,
}

impl Record for Job {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Job {
    pub fn skill_list(&self) -> Vec<&str> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Fields for a job being posted; identifier and posted date are
/// assigned by the manager.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_range: String,
    pub job_type: String,
    pub deadline: String,
    pub description: String,
    pub skills: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    MostRecent,
    SalaryHighToLow,
    SalaryLowToHigh,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    /// Case-insensitive substring over title, company, and skills.
    pub search_query: Option<String>,
    pub job_types: Vec<String>,
    pub locations: Vec<String>,
    /// Inclusive bounds on the parsed salary range.
    pub salary_range: Option<(f64, f64)>,
    pub sort_by: Option<SortBy>,
}

#[derive(Debug, Clone)]
pub struct JobStatistics {
    pub active_jobs: usize,
    pub companies: usize,
    pub recent_jobs: usize,
    pub average_salary: Option<f64>,
}

pub struct JobManager {
    table: Table<Job>,
    digit_run: Regex,
}

impl JobManager {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let table = Table::open(&data_dir.join("jobs.csv"))?;
        let digit_run = Regex::new(r"\d+").expect("Invalid digit-run regex");
        Ok(Self { table, digit_run })
    }

    pub fn create(&mut self, new_job: NewJob) -> Result<Job> {
        let job = Job {
            id: self.table.next_id("JOB"),
            title: new_job.title,
            company: new_job.company,
            location: new_job.location,
            salary_range: new_job.salary_range,
            job_type: new_job.job_type,
            posted_date: Local::now().format("%Y-%m-%d").to_string(),
            deadline: new_job.deadline,
            description: new_job.description,
            skills: new_job.skills,
            status: JobStatus::Open,
        };
        self.table.insert(job.clone())?;
        Ok(job)
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.table.get(id)
    }

    pub fn all(&self) -> &[Job] {
        self.table.rows()
    }

    /// In-memory filtering and sorting over the loaded table.
    pub fn search(&self, filters: &JobFilters) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .table
            .rows()
            .iter()
            .filter(|job| self.matches(job, filters))
            .cloned()
            .collect();

        match filters.sort_by {
            Some(SortBy::MostRecent) => {
                jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
            }
            Some(SortBy::SalaryHighToLow) => {
                jobs.sort_by(|a, b| {
                    let a_avg = self.average_of(&a.salary_range).unwrap_or(0.0);
                    let b_avg = self.average_of(&b.salary_range).unwrap_or(0.0);
                    b_avg.partial_cmp(&a_avg).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            Some(SortBy::SalaryLowToHigh) => {
                jobs.sort_by(|a, b| {
                    let a_avg = self.average_of(&a.salary_range).unwrap_or(0.0);
                    let b_avg = self.average_of(&b.salary_range).unwrap_or(0.0);
                    a_avg.partial_cmp(&b_avg).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            None => {}
        }

        jobs
    }

    fn matches(&self, job: &Job, filters: &JobFilters) -> bool {
        if let Some(query) = &filters.search_query {
            let query = query.to_lowercase();
            if !query.is_empty() {
                let haystack = format!(
                    "{} {} {}",
                    job.title.to_lowercase(),
                    job.company.to_lowercase(),
                    job.skills.to_lowercase()
                );
                if !haystack.contains(&query) {
                    return false;
                }
            }
        }

        if !filters.job_types.is_empty() && !filters.job_types.contains(&job.job_type) {
            return false;
        }

        if !filters.locations.is_empty() && !filters.locations.contains(&job.location) {
            return false;
        }

        if let Some((filter_min, filter_max)) = filters.salary_range {
            // Jobs without a parseable salary are excluded from salary
            // filtering rather than failing the whole search.
            match self.parse_salary(&job.salary_range) {
                Some((job_min, job_max)) => {
                    if job_min < filter_min || job_max > filter_max {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }

    /// Extracts (min, max) from a free-text salary range using the first
    /// and last digit runs. Returns None when no digits are present.
    pub fn parse_salary(&self, salary_range: &str) -> Option<(f64, f64)> {
        let mut runs = self.digit_run.find_iter(salary_range);
        let first = runs.next()?;
        let last = runs.last().unwrap_or(first);
        let min: f64 = first.as_str().parse().ok()?;
        let max: f64 = last.as_str().parse().ok()?;
        Some((min, max))
    }

    fn average_of(&self, salary_range: &str) -> Option<f64> {
        self.parse_salary(salary_range)
            .map(|(min, max)| (min + max) / 2.0)
    }

    pub fn update_status(&mut self, id: &str, status: JobStatus) -> Result<bool> {
        self.table.update(id, |job| job.status = status)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.table.remove(id)?.is_some())
    }

    pub fn statistics(&self) -> JobStatistics {
        let jobs = self.table.rows();
        let companies: HashSet<&str> = jobs.iter().map(|j| j.company.as_str()).collect();

        let cutoff = Local::now().date_naive() - Duration::days(7);
        let recent_jobs = jobs
            .iter()
            .filter(|j| {
                NaiveDate::parse_from_str(&j.posted_date, "%Y-%m-%d")
                    .map(|d| d >= cutoff)
                    .unwrap_or(false)
            })
            .count();

        let averages: Vec<f64> = jobs
            .iter()
            .filter_map(|j| self.average_of(&j.salary_range))
            .collect();
        let average_salary = if averages.is_empty() {
            None
        } else {
            Some(averages.iter().sum::<f64>() / averages.len() as f64)
        };

        JobStatistics {
            active_jobs: jobs.len(),
            companies: companies.len(),
            recent_jobs,
            average_salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, JobManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = JobManager::open(dir.path()).unwrap();
        (dir, manager)
    }

    fn new_job(title: &str, company: &str, salary: &str, skills: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: company.to_string(),
            location: "Bangalore".to_string(),
            salary_range: salary.to_string(),
            job_type: "Full-time".to_string(),
            deadline: "2026-12-31".to_string(),
            description: "Build things.".to_string(),
            skills: skills.to_string(),
        }
    }

    #[test]
    fn test_create_then_get_returns_input_fields() {
        let (_dir, mut manager) = manager();
        let created = manager
            .create(new_job("Software Engineer", "Google", "30-60 LPA", "Python, SQL"))
            .unwrap();

        let fetched = manager.get(&created.id).unwrap();
        assert_eq!(fetched.title, "Software Engineer");
        assert_eq!(fetched.company, "Google");
        assert_eq!(fetched.salary_range, "30-60 LPA");
        assert_eq!(fetched.status, JobStatus::Open);
        assert_eq!(fetched.skill_list(), vec!["Python", "SQL"]);
    }

    #[test]
    fn test_search_query_substring() {
        let (_dir, mut manager) = manager();
        manager
            .create(new_job("ML Engineer", "Microsoft", "40-70 LPA", "Python, PyTorch"))
            .unwrap();
        manager
            .create(new_job("Frontend Developer", "Amazon", "25-45 LPA", "React, Node"))
            .unwrap();

        let filters = JobFilters {
            search_query: Some("pytorch".to_string()),
            ..Default::default()
        };
        let results = manager.search(&filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "ML Engineer");
    }

    #[test]
    fn test_salary_parse_first_and_last_runs() {
        let (_dir, manager) = manager();
        assert_eq!(manager.parse_salary("30-60 LPA"), Some((30.0, 60.0)));
        assert_eq!(manager.parse_salary("12 LPA"), Some((12.0, 12.0)));
        assert_eq!(manager.parse_salary("Competitive"), None);
    }

    #[test]
    fn test_salary_filter_excludes_unparseable() {
        let (_dir, mut manager) = manager();
        manager
            .create(new_job("A", "X", "30-60 LPA", "Python"))
            .unwrap();
        manager
            .create(new_job("B", "Y", "Competitive", "Python"))
            .unwrap();

        let filters = JobFilters {
            salary_range: Some((20.0, 80.0)),
            ..Default::default()
        };
        let results = manager.search(&filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "A");
    }

    #[test]
    fn test_sort_by_salary() {
        let (_dir, mut manager) = manager();
        manager
            .create(new_job("Low", "X", "10-20 LPA", "Python"))
            .unwrap();
        manager
            .create(new_job("High", "Y", "50-80 LPA", "Python"))
            .unwrap();

        let filters = JobFilters {
            sort_by: Some(SortBy::SalaryHighToLow),
            ..Default::default()
        };
        let results = manager.search(&filters);
        assert_eq!(results[0].title, "High");

        let filters = JobFilters {
            sort_by: Some(SortBy::SalaryLowToHigh),
            ..Default::default()
        };
        let results = manager.search(&filters);
        assert_eq!(results[0].title, "Low");
    }

    #[test]
    fn test_close_and_delete() {
        let (_dir, mut manager) = manager();
        let job = manager
            .create(new_job("A", "X", "30-60 LPA", "Python"))
            .unwrap();

        assert!(manager.update_status(&job.id, JobStatus::Closed).unwrap());
        assert_eq!(manager.get(&job.id).unwrap().status, JobStatus::Closed);

        assert!(manager.delete(&job.id).unwrap());
        assert!(manager.get(&job.id).is_none());
    }

    #[test]
    fn test_statistics() {
        let (_dir, mut manager) = manager();
        manager
            .create(new_job("A", "Google", "30-60 LPA", "Python"))
            .unwrap();
        manager
            .create(new_job("B", "Google", "10-20 LPA", "Java"))
            .unwrap();

        let stats = manager.statistics();
        assert_eq!(stats.active_jobs, 2);
        assert_eq!(stats.companies, 1);
        assert_eq!(stats.recent_jobs, 2);
        assert_eq!(stats.average_salary, Some((45.0 + 15.0) / 2.0));
    }
}
