use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Pipeline position of an applicant. Any state may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateStatus {
    #[default]
    Applied,
    Shortlisted,
    Interview,
    Selected,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 5] = [
        CandidateStatus::Applied,
        CandidateStatus::Shortlisted,
        CandidateStatus::Interview,
        CandidateStatus::Selected,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "Applied",
            CandidateStatus::Shortlisted => "Shortlisted",
            CandidateStatus::Interview => "Interview",
            CandidateStatus::Selected => "Selected",
            CandidateStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}'. Expected one of: Applied, Shortlisted, Interview, Selected, Rejected")]
pub struct InvalidCandidateStatus(pub String);

impl FromStr for CandidateStatus {
    type Err = InvalidCandidateStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidCandidateStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_filename: String,
    pub resume_content_type: String,
    pub resume_size: i64,
    pub status: CandidateStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Key used to detect a second application from the same address.
    pub fn email_key(email: &str) -> String {
        email.trim().to_lowercase()
    }
}
