use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, DUPLICATE_APPLICATION, JOB_HAS_CANDIDATES, JOB_NOT_ACCEPTING, JOB_NOT_FOUND};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::job::{Job, JobFields, JobStatus};

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, Job>,
    candidates: HashMap<Uuid, Candidate>,
}

/// Process-local store. All writes happen under one lock, which gives the
/// same atomicity the Postgres constraints provide.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_jobs_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

fn newest_candidates_first(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_job(&self, job: &Job) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.jobs.contains_key(&job.id) {
            return Err(Error::Conflict(format!("Job {} already exists", job.id)));
        }
        tables.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<Job> = tables.jobs.values().cloned().collect();
        newest_jobs_first(&mut jobs);
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn update_job(
        &self,
        id: Uuid,
        fields: &JobFields,
        status: Option<JobStatus>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>> {
        let mut tables = self.tables.write().await;
        Ok(tables.jobs.get_mut(&id).map(|job| {
            job.apply(fields.clone(), status, updated_at);
            job.clone()
        }))
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.jobs.contains_key(&id) {
            return Err(Error::NotFound(JOB_NOT_FOUND.into()));
        }
        if tables.candidates.values().any(|c| c.job_id == id) {
            return Err(Error::Conflict(JOB_HAS_CANDIDATES.into()));
        }
        tables.jobs.remove(&id);
        Ok(())
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .get(&candidate.job_id)
            .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.into()))?;
        if !job.status.accepts_applications() {
            return Err(Error::Conflict(JOB_NOT_ACCEPTING.into()));
        }
        let key = Candidate::email_key(&candidate.email);
        let duplicate = tables
            .candidates
            .values()
            .any(|c| c.job_id == candidate.job_id && Candidate::email_key(&c.email) == key);
        if duplicate {
            return Err(Error::Conflict(DUPLICATE_APPLICATION.into()));
        }
        tables.candidates.insert(candidate.id, candidate.clone());
        Ok(())
    }

    async fn list_candidates(&self, job_id: Option<Uuid>) -> Result<Vec<Candidate>> {
        let tables = self.tables.read().await;
        let mut candidates: Vec<Candidate> = tables
            .candidates
            .values()
            .filter(|c| job_id.map_or(true, |id| c.job_id == id))
            .cloned()
            .collect();
        newest_candidates_first(&mut candidates);
        Ok(candidates)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        Ok(self.tables.read().await.candidates.get(&id).cloned())
    }

    async fn find_application(&self, job_id: Uuid, email: &str) -> Result<Option<Candidate>> {
        let key = Candidate::email_key(email);
        let tables = self.tables.read().await;
        Ok(tables
            .candidates
            .values()
            .find(|c| c.job_id == job_id && Candidate::email_key(&c.email) == key)
            .cloned())
    }

    async fn update_candidate_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Candidate>> {
        let mut tables = self.tables.write().await;
        Ok(tables.candidates.get_mut(&id).map(|candidate| {
            candidate.status = status;
            candidate.updated_at = updated_at;
            candidate.clone()
        }))
    }

    async fn status_counts(&self) -> Result<Vec<(CandidateStatus, i64)>> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<CandidateStatus, i64> = HashMap::new();
        for candidate in tables.candidates.values() {
            *counts.entry(candidate.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
