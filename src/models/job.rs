use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    #[serde(rename = "On Hold", alias = "OnHold")]
    OnHold,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Open, JobStatus::Closed, JobStatus::OnHold];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
            JobStatus::OnHold => "On Hold",
        }
    }

    pub fn accepts_applications(&self) -> bool {
        matches!(self, JobStatus::Open)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid job status '{0}'. Expected one of: Open, Closed, On Hold")]
pub struct InvalidJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = InvalidJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(JobStatus::Open),
            "Closed" => Ok(JobStatus::Closed),
            "On Hold" | "OnHold" => Ok(JobStatus::OnHold),
            other => Err(InvalidJobStatus(other.to_string())),
        }
    }
}

/// Descriptive fields of a posting. Values are expected to be trimmed before
/// validation, so an all-whitespace input fails the length rules.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct JobFields {
    #[validate(length(min = 1, max = 200, message = "job_title is required (max 200 characters)"))]
    pub job_title: String,
    #[validate(length(min = 1, max = 100, message = "department is required (max 100 characters)"))]
    pub department: String,
    #[validate(length(min = 1, message = "at least one skill is required"))]
    pub skills: Vec<String>,
    #[validate(length(min = 1, message = "experience is required"))]
    pub experience: String,
    #[validate(length(min = 1, message = "salary is required"))]
    pub salary: String,
    #[validate(length(min = 1, max = 200, message = "location is required (max 200 characters)"))]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub job_title: String,
    pub department: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub salary: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(fields: JobFields, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_title: fields.job_title,
            department: fields.department,
            skills: fields.skills,
            experience: fields.experience,
            salary: fields.salary,
            location: fields.location,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the descriptive fields and, when given, the status. Identity
    /// and `created_at` are left alone.
    pub fn apply(&mut self, fields: JobFields, status: Option<JobStatus>, now: DateTime<Utc>) {
        self.job_title = fields.job_title;
        self.department = fields.department;
        self.skills = fields.skills;
        self.experience = fields.experience;
        self.salary = fields.salary;
        self.location = fields.location;
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
