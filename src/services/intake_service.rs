use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use crate::database::{BlobStore, Store, DUPLICATE_APPLICATION, JOB_NOT_ACCEPTING};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::services::job_service::JobService;
use crate::utils::{time::now, validation::validate};

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const RESUME_REQUIRED: &str = "Resume file is required";
pub const UNSUPPORTED_FILE_TYPE: &str =
    "Unsupported file type: only PDF, DOC and DOCX resumes are accepted";
pub const FILE_TOO_LARGE: &str = "File too large: resumes must be at most 5 MB";

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Validate)]
pub struct ApplicantDetails {
    #[validate(length(min = 1, max = 200, message = "name is required (max 200 characters)"))]
    pub name: String,
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
}

impl ApplicantDetails {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub job_id: Uuid,
    pub applicant: ApplicantDetails,
    pub resume: Option<ResumeUpload>,
}

/// Media type without parameters, lowercased.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Final path component of a client-supplied name; browsers on some platforms
/// send full paths.
fn sanitize_filename(raw: &str) -> String {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    if name.is_empty() {
        "resume".to_string()
    } else {
        name
    }
}

/// Checks the uploaded file against the resume rules in order: presence,
/// declared media type, size.
pub fn check_resume(resume: Option<ResumeUpload>) -> Result<ResumeUpload> {
    let resume = resume
        .filter(|r| !r.data.is_empty())
        .ok_or_else(|| Error::BadRequest(RESUME_REQUIRED.into()))?;

    let media_type = resume.content_type.as_deref().map(essence);
    let allowed = media_type
        .as_deref()
        .map(|t| ALLOWED_RESUME_TYPES.contains(&t))
        .unwrap_or(false);
    if !allowed {
        return Err(Error::BadRequest(UNSUPPORTED_FILE_TYPE.into()));
    }

    if resume.data.len() > MAX_RESUME_BYTES {
        return Err(Error::BadRequest(FILE_TOO_LARGE.into()));
    }

    Ok(ResumeUpload {
        filename: sanitize_filename(&resume.filename),
        content_type: media_type,
        data: resume.data,
    })
}

#[derive(Clone)]
pub struct IntakeService {
    jobs: JobService,
    store: Arc<dyn Store>,
    blobs: Arc<dyn BlobStore>,
}

impl IntakeService {
    pub fn new(jobs: JobService, store: Arc<dyn Store>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { jobs, store, blobs }
    }

    /// Turns a submission into a persisted candidate. Every rule is checked
    /// before anything is written; the resume blob is stored before the
    /// candidate record so no reader sees a candidate without its resume.
    pub async fn submit(&self, submission: ApplicationSubmission) -> Result<Candidate> {
        let job = self.jobs.get_by_id(submission.job_id).await?;
        if !job.status.accepts_applications() {
            tracing::warn!(job_id = %job.id, status = %job.status, "Application to closed job rejected");
            return Err(Error::Conflict(JOB_NOT_ACCEPTING.into()));
        }

        let applicant = submission.applicant;
        validate(&applicant)?;
        let resume = check_resume(submission.resume)?;

        if self
            .store
            .find_application(job.id, &applicant.email)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(DUPLICATE_APPLICATION.into()));
        }

        let candidate_id = Uuid::new_v4();
        let resume_size = resume.data.len() as i64;
        self.blobs.put(candidate_id, resume.data).await?;

        let applied_at = now();
        let candidate = Candidate {
            id: candidate_id,
            job_id: job.id,
            name: applicant.name,
            email: applicant.email,
            phone: applicant.phone,
            resume_filename: resume.filename,
            resume_content_type: resume.content_type.unwrap_or_default(),
            resume_size,
            status: CandidateStatus::Applied,
            applied_at,
            updated_at: applied_at,
        };

        if let Err(err) = self.store.insert_candidate(&candidate).await {
            if let Err(cleanup) = self.blobs.remove(candidate_id).await {
                tracing::warn!(candidate_id = %candidate_id, error = %cleanup, "Failed to remove orphaned resume");
            }
            return Err(err);
        }

        tracing::info!(candidate_id = %candidate.id, job_id = %job.id, "Application accepted");
        Ok(candidate)
    }
}
