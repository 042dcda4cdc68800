pub mod blob;
pub mod memory;
pub mod pool;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::job::{Job, JobFields, JobStatus};

pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const JOB_NOT_FOUND: &str = "Job not found";
pub const CANDIDATE_NOT_FOUND: &str = "Candidate not found";
pub const JOB_HAS_CANDIDATES: &str = "Job has candidates and cannot be deleted";
pub const DUPLICATE_APPLICATION: &str = "You have already applied for this job";
pub const JOB_NOT_ACCEPTING: &str = "This job is no longer accepting applications";

/// Durable home of job and candidate records. Every mutation is a single
/// atomic step; callers never read-modify-write.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_job(&self, job: &Job) -> Result<()>;

    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;

    /// Replaces the descriptive fields and, when given, the status.
    /// Returns `None` when the job does not exist.
    async fn update_job(
        &self,
        id: Uuid,
        fields: &JobFields,
        status: Option<JobStatus>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>>;

    /// Fails with `NotFound` for an unknown id and `Conflict` while any
    /// candidate still references the job.
    async fn delete_job(&self, id: Uuid) -> Result<()>;

    /// Fails with `NotFound` if the job is gone, and with `Conflict` if the
    /// job is no longer Open or the same email already applied to it.
    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()>;

    /// Candidates newest first, optionally restricted to one job.
    async fn list_candidates(&self, job_id: Option<Uuid>) -> Result<Vec<Candidate>>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>>;

    async fn find_application(&self, job_id: Uuid, email: &str) -> Result<Option<Candidate>>;

    async fn update_candidate_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Candidate>>;

    async fn status_counts(&self) -> Result<Vec<(CandidateStatus, i64)>>;
}

/// Picks the record backend from configuration: Postgres when a database URL
/// is set (migrations are applied on connect), otherwise process memory.
pub async fn open_store(config: &Config) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let pool = pool::create_pool(url, config.database_max_connections).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Connected to Postgres and applied migrations");
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; records are kept in memory and lost on restart");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
