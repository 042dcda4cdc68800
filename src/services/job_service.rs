use std::sync::Arc;

use uuid::Uuid;

use crate::database::{Store, JOB_NOT_FOUND};
use crate::dto::job_dto::JobPayload;
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::services::job_query::{self, JobFilter};
use crate::utils::{time::now, validation::validate};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let jobs = self.store.list_jobs().await?;
        Ok(filter.apply(jobs))
    }

    pub async fn departments(&self) -> Result<Vec<String>> {
        let jobs = self.store.list_jobs().await?;
        Ok(job_query::departments(&jobs))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Job> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.into()))
    }

    /// New postings always start Open; a `status` in the payload is ignored.
    pub async fn create(&self, payload: JobPayload) -> Result<Job> {
        let fields = payload.normalized_fields();
        validate(&fields)?;

        let job = Job::new(fields, now());
        self.store.insert_job(&job).await?;
        tracing::info!(job_id = %job.id, title = %job.job_title, "Job created");
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, payload: JobPayload) -> Result<Job> {
        let fields = payload.normalized_fields();
        validate(&fields)?;
        let status = payload
            .status
            .as_deref()
            .map(|raw| raw.trim().parse::<JobStatus>())
            .transpose()
            .map_err(|e| Error::BadRequest(e.to_string()))?;

        let job = self
            .store
            .update_job(id, &fields, status, now())
            .await?
            .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.into()))?;
        tracing::info!(job_id = %job.id, status = %job.status, "Job updated");
        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete_job(id).await?;
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }
}
