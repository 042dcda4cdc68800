use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use crate::{
    dto::candidate_dto::{ApplicationForm, CandidateResponse, DashboardStats, StatusUpdatePayload},
    error::{Error, Result},
    routes::{parse_candidate_id, parse_job_id},
    services::intake_service::{ApplicantDetails, ApplicationSubmission, ResumeUpload},
    AppState,
};

pub const JOB_ID_REQUIRED: &str = "job_id is required";

/// Text fields and the resume file of an application form, as sent.
#[derive(Default)]
struct ApplicationFields {
    name: String,
    email: String,
    phone: String,
    job_id: Option<String>,
    resume: Option<ResumeUpload>,
}

async fn read_application(mut multipart: Multipart) -> Result<ApplicationFields> {
    let mut fields = ApplicationFields::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => fields.name = field.text().await?,
            "email" => fields.email = field.text().await?,
            "phone" => fields.phone = field.text().await?,
            "job_id" => fields.job_id = Some(field.text().await?),
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                fields.resume = Some(ResumeUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown application field");
            }
        }
    }

    Ok(fields)
}

#[utoipa::path(
    post,
    path = "/api/apply",
    request_body(content = ApplicationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Application accepted", body = CandidateResponse),
        (status = 400, description = "Invalid applicant details or resume"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job closed or duplicate application"),
        (status = 429, description = "Too many requests")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let fields = read_application(multipart?).await?;

    let job_id = fields
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| Error::BadRequest(JOB_ID_REQUIRED.into()))?;
    let job_id = parse_job_id(job_id)?;

    let candidate = state
        .intake
        .submit(ApplicationSubmission {
            job_id,
            applicant: ApplicantDetails::new(&fields.name, &fields.email, &fields.phone),
            resume: fields.resume,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CandidateResponse::from(candidate))))
}

#[utoipa::path(
    get,
    path = "/api/candidates",
    responses(
        (status = 200, description = "All candidates, newest first", body = Vec<CandidateResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let candidates = state.candidates.list_candidates().await?;
    Ok(Json(
        candidates
            .into_iter()
            .map(CandidateResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID (UUID)")
    ),
    responses(
        (status = 200, description = "Candidates for the job", body = Vec<CandidateResponse>),
        (status = 400, description = "Malformed job ID"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse> {
    let job_id = parse_job_id(&job_id)?;
    let candidates = state.candidates.list_for_job(job_id).await?;
    Ok(Json(
        candidates
            .into_iter()
            .map(CandidateResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/candidate/{id}",
    params(
        ("id" = String, Path, description = "Candidate ID (UUID)")
    ),
    responses(
        (status = 200, description = "Candidate found", body = CandidateResponse),
        (status = 400, description = "Malformed candidate ID"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let candidate = state.candidates.get_candidate(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    put,
    path = "/api/candidate/status/{id}",
    params(
        ("id" = String, Path, description = "Candidate ID (UUID)")
    ),
    request_body = StatusUpdatePayload,
    responses(
        (status = 200, description = "Status updated", body = CandidateResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StatusUpdatePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let Json(payload) = payload?;
    let candidate = state.candidates.update_status(id, &payload.status).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

/// `attachment` disposition with a filename safe to put inside quotes.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[utoipa::path(
    get,
    path = "/api/candidate/{id}/resume",
    params(
        ("id" = String, Path, description = "Candidate ID (UUID)")
    ),
    responses(
        (status = 200, description = "Resume file with its stored media type"),
        (status = 400, description = "Malformed candidate ID"),
        (status = 404, description = "Candidate or resume not found")
    )
)]
#[axum::debug_handler]
pub async fn download_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_candidate_id(&id)?;
    let (candidate, data) = state.candidates.resume(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, candidate.resume_content_type),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&candidate.resume_filename),
            ),
        ],
        data,
    ))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Job and pipeline counts", body = DashboardStats)
    )
)]
#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.candidates.dashboard_stats().await?))
}
