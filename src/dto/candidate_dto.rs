use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidateResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_filename: String,
    pub resume_content_type: String,
    pub resume_size: i64,
    #[schema(value_type = String, example = "Applied")]
    pub status: CandidateStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateResponse {
    fn from(value: Candidate) -> Self {
        Self {
            id: value.id,
            job_id: value.job_id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            resume_filename: value.resume_filename,
            resume_content_type: value.resume_content_type,
            resume_size: value.resume_size,
            status: value.status,
            applied_at: value.applied_at,
            updated_at: value.updated_at,
        }
    }
}

/// Body of `PUT /candidate/status/{id}`. Kept as text so an unknown value is
/// reported with the list of accepted ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct StatusUpdatePayload {
    #[schema(example = "Interview")]
    pub status: String,
}

/// Multipart form accepted by `POST /apply`; documentation only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_id: String,
    #[schema(value_type = String, format = Binary)]
    pub resume: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub open_jobs: i64,
    pub total_candidates: i64,
    /// Count per pipeline status; every status is present, zero included.
    pub candidates_by_status: BTreeMap<String, i64>,
}
