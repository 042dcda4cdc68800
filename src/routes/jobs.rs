use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::job_dto::{JobListQuery, JobPayload, JobResponse},
    error::Result,
    routes::parse_job_id,
    services::job_query::JobFilter,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/",
    params(JobListQuery),
    responses(
        (status = 200, description = "Jobs, newest first", body = Vec<JobResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let filter = JobFilter::from(query);
    let jobs = state.jobs.list(&filter).await?;
    Ok(Json(
        jobs.into_iter().map(JobResponse::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jobs/departments",
    responses(
        (status = 200, description = "Distinct departments", body = Vec<String>)
    )
)]
#[axum::debug_handler]
pub async fn list_departments(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.jobs.departments().await?))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID (UUID)")
    ),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 400, description = "Malformed job ID"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_job_id(&id)?;
    let job = state.jobs.get_by_id(id).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    post,
    path = "/api/jobs/",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    payload: std::result::Result<Json<JobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    let job = state.jobs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID (UUID)")
    ),
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid payload or status"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<JobPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_job_id(&id)?;
    let Json(payload) = payload?;
    let job = state.jobs.update(id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID (UUID)")
    ),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job has candidates")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_job_id(&id)?;
    state.jobs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
