use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Store, DUPLICATE_APPLICATION, JOB_HAS_CANDIDATES, JOB_NOT_ACCEPTING, JOB_NOT_FOUND};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::job::{Job, JobFields, JobStatus};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

const JOB_COLUMNS: &str =
    "id, job_title, department, skills, experience, salary, location, status, created_at, updated_at";

const CANDIDATE_COLUMNS: &str = "id, job_id, name, email, phone, resume_filename, resume_content_type, resume_size, status, applied_at, updated_at";

#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    job_title: String,
    department: String,
    skills: Vec<String>,
    experience: String,
    salary: String,
    location: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = Error;

    fn try_from(row: JobRow) -> Result<Self> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|e| Error::Internal(format!("job {} has a corrupt status: {}", row.id, e)))?;
        Ok(Job {
            id: row.id,
            job_title: row.job_title,
            department: row.department,
            skills: row.skills,
            experience: row.experience,
            salary: row.salary,
            location: row.location,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    job_id: Uuid,
    name: String,
    email: String,
    phone: String,
    resume_filename: String,
    resume_content_type: String,
    resume_size: i64,
    status: String,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = Error;

    fn try_from(row: CandidateRow) -> Result<Self> {
        let status = row.status.parse::<CandidateStatus>().map_err(|e| {
            Error::Internal(format!("candidate {} has a corrupt status: {}", row.id, e))
        })?;
        Ok(Candidate {
            id: row.id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            resume_filename: row.resume_filename,
            resume_content_type: row.resume_content_type,
            resume_size: row.resume_size,
            status,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}

fn is_violation(err: &sqlx::Error, code: &str) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.as_ref() == code)
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_job(&self, job: &Job) -> Result<()> {
        let sql = format!(
            "INSERT INTO jobs ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            JOB_COLUMNS
        );
        sqlx::query(&sql)
            .bind(job.id)
            .bind(&job.job_title)
            .bind(&job.department)
            .bind(job.skills.as_slice())
            .bind(&job.experience)
            .bind(&job.salary)
            .bind(&job.location)
            .bind(job.status.as_str())
            .bind(job.created_at)
            .bind(job.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC, id",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Job::try_from).collect()
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Job::try_from).transpose()
    }

    async fn update_job(
        &self,
        id: Uuid,
        fields: &JobFields,
        status: Option<JobStatus>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>> {
        let sql = format!(
            r#"
            UPDATE jobs
            SET
                job_title = $2,
                department = $3,
                skills = $4,
                experience = $5,
                salary = $6,
                location = $7,
                status = COALESCE($8, status),
                updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(&fields.job_title)
            .bind(&fields.department)
            .bind(fields.skills.as_slice())
            .bind(&fields.experience)
            .bind(&fields.salary)
            .bind(&fields.location)
            .bind(status.map(|s| s.as_str()))
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Job::try_from).transpose()
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        // candidates.job_id is ON DELETE RESTRICT, so a referenced job can
        // never disappear between a check and the delete.
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(Error::NotFound(JOB_NOT_FOUND.into())),
            Ok(_) => Ok(()),
            Err(err) if is_violation(&err, FOREIGN_KEY_VIOLATION) => {
                Err(Error::Conflict(JOB_HAS_CANDIDATES.into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()> {
        // The job row is share-locked so a concurrent close or delete waits for
        // this insert, or this insert sees the job already closed.
        let sql = format!(
            r#"
            INSERT INTO candidates ({})
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
            WHERE EXISTS (
                SELECT 1 FROM jobs WHERE id = $2 AND status = 'Open' FOR SHARE
            )
            "#,
            CANDIDATE_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(candidate.id)
            .bind(candidate.job_id)
            .bind(&candidate.name)
            .bind(&candidate.email)
            .bind(&candidate.phone)
            .bind(&candidate.resume_filename)
            .bind(&candidate.resume_content_type)
            .bind(candidate.resume_size)
            .bind(candidate.status.as_str())
            .bind(candidate.applied_at)
            .bind(candidate.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM jobs WHERE id = $1")
                    .bind(candidate.job_id)
                    .fetch_optional(&self.pool)
                    .await?;
                match exists {
                    Some(_) => Err(Error::Conflict(JOB_NOT_ACCEPTING.into())),
                    None => Err(Error::NotFound(JOB_NOT_FOUND.into())),
                }
            }
            Ok(_) => Ok(()),
            Err(err) if is_violation(&err, FOREIGN_KEY_VIOLATION) => {
                Err(Error::NotFound(JOB_NOT_FOUND.into()))
            }
            Err(err) if is_violation(&err, UNIQUE_VIOLATION) => {
                Err(Error::Conflict(DUPLICATE_APPLICATION.into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_candidates(&self, job_id: Option<Uuid>) -> Result<Vec<Candidate>> {
        let sql = format!(
            "SELECT {} FROM candidates WHERE ($1::uuid IS NULL OR job_id = $1) ORDER BY applied_at DESC, id",
            CANDIDATE_COLUMNS
        );
        let rows = sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Candidate::try_from).collect()
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let row = sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Candidate::try_from).transpose()
    }

    async fn find_application(&self, job_id: Uuid, email: &str) -> Result<Option<Candidate>> {
        let sql = format!(
            "SELECT {} FROM candidates WHERE job_id = $1 AND lower(email) = $2 LIMIT 1",
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(job_id)
            .bind(Candidate::email_key(email))
            .fetch_optional(&self.pool)
            .await?;
        row.map(Candidate::try_from).transpose()
    }

    async fn update_candidate_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Candidate>> {
        let sql = format!(
            "UPDATE candidates SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Candidate::try_from).transpose()
    }

    async fn status_counts(&self) -> Result<Vec<(CandidateStatus, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM candidates GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status
                    .parse::<CandidateStatus>()
                    .map_err(|e| Error::Internal(e.to_string()))?;
                Ok((status, count))
            })
            .collect()
    }
}
