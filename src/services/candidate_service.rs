use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::database::{BlobStore, Store, CANDIDATE_NOT_FOUND, JOB_NOT_FOUND};
use crate::dto::candidate_dto::DashboardStats;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::utils::time::now;

pub const RESUME_NOT_FOUND: &str = "Resume not found";

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn Store>,
    blobs: Arc<dyn BlobStore>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn Store>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.store.list_candidates(None).await
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>> {
        if self.store.get_job(job_id).await?.is_none() {
            return Err(Error::NotFound(JOB_NOT_FOUND.into()));
        }
        self.store.list_candidates(Some(job_id)).await
    }

    pub async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
        self.store
            .get_candidate(id)
            .await?
            .ok_or_else(|| Error::NotFound(CANDIDATE_NOT_FOUND.into()))
    }

    /// Moves a candidate to any pipeline status. The value is checked before
    /// storage is touched, so a bad value never changes anything.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Candidate> {
        let status = status
            .trim()
            .parse::<CandidateStatus>()
            .map_err(|e| Error::BadRequest(e.to_string()))?;

        let candidate = self
            .store
            .update_candidate_status(id, status, now())
            .await?
            .ok_or_else(|| Error::NotFound(CANDIDATE_NOT_FOUND.into()))?;
        tracing::info!(candidate_id = %id, status = %status, "Candidate status updated");
        Ok(candidate)
    }

    pub async fn resume(&self, id: Uuid) -> Result<(Candidate, Bytes)> {
        let candidate = self.get_candidate(id).await?;
        let data = self.blobs.get(id).await?.ok_or_else(|| {
            tracing::warn!(candidate_id = %id, "Resume blob missing for candidate");
            Error::NotFound(RESUME_NOT_FOUND.into())
        })?;
        Ok((candidate, data))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let jobs = self.store.list_jobs().await?;
        let counts = self.store.status_counts().await?;

        let mut candidates_by_status: BTreeMap<String, i64> = CandidateStatus::ALL
            .iter()
            .map(|status| (status.as_str().to_string(), 0))
            .collect();
        for (status, count) in &counts {
            candidates_by_status.insert(status.as_str().to_string(), *count);
        }

        Ok(DashboardStats {
            total_jobs: jobs.len() as i64,
            open_jobs: jobs
                .iter()
                .filter(|job| job.status.accepts_applications())
                .count() as i64,
            total_candidates: counts.iter().map(|(_, count)| count).sum(),
            candidates_by_status,
        })
    }
}
