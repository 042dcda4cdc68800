use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    BoxError, Json, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{
    config::Config,
    dto::{
        candidate_dto::{ApplicationForm, CandidateResponse, DashboardStats, StatusUpdatePayload},
        job_dto::{JobPayload, JobResponse},
    },
    error::{Error, Result},
    middleware::{
        cors::cors_layer,
        throttle::{throttle_requests, Throttle},
    },
    AppState,
};

pub mod candidate_routes;
pub mod health;
pub mod jobs;

pub const INVALID_JOB_ID: &str = "Invalid job ID format";
pub const INVALID_CANDIDATE_ID: &str = "Invalid candidate ID format";

pub fn parse_job_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::BadRequest(INVALID_JOB_ID.into()))
}

pub fn parse_candidate_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::BadRequest(INVALID_CANDIDATE_ID.into()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        jobs::list_jobs,
        jobs::list_departments,
        jobs::get_job,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        candidate_routes::apply,
        candidate_routes::list_candidates,
        candidate_routes::list_candidates_for_job,
        candidate_routes::get_candidate,
        candidate_routes::update_candidate_status,
        candidate_routes::download_resume,
        candidate_routes::dashboard_stats,
    ),
    components(schemas(
        JobPayload,
        JobResponse,
        CandidateResponse,
        StatusUpdatePayload,
        ApplicationForm,
        DashboardStats,
    )),
    tags(
        (name = "recruitment-portal", description = "Job postings and applicant tracking")
    )
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// The full application: `/health` plus every API route under `/api`.
pub fn router(state: AppState, config: &Config) -> Router {
    let apply_throttle = Throttle::per_second(config.apply_rps);

    let api = Router::new()
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/jobs/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/jobs/departments", get(jobs::list_departments))
        .route(
            "/jobs/:id",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/apply",
            post(candidate_routes::apply).layer(middleware::from_fn_with_state(
                apply_throttle,
                throttle_requests,
            )),
        )
        .route("/candidates", get(candidate_routes::list_candidates))
        .route(
            "/candidates/:job_id",
            get(candidate_routes::list_candidates_for_job),
        )
        .route("/candidate/:id", get(candidate_routes::get_candidate))
        .route(
            "/candidate/:id/resume",
            get(candidate_routes::download_resume),
        )
        .route(
            "/candidate/status/:id",
            put(candidate_routes::update_candidate_status),
        )
        .route("/dashboard/stats", get(candidate_routes::dashboard_stats))
        .route("/openapi.json", get(openapi));

    let app = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors_layer(&config.cors_origins));

    with_request_timeout(app, config.request_timeout).layer(TraceLayer::new_for_http())
}

/// Aborts requests that run past `timeout` with a 408 and the usual `detail` body.
pub fn with_request_timeout(app: Router, timeout: Duration) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_layer_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_layer_error(err: BoxError) -> Error {
    if err.is::<Elapsed>() {
        tracing::warn!(error = %err, "request timed out");
        Error::RequestTimeout
    } else {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_job_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_candidate_id(&format!(" {} ", id)).unwrap(), id);
    }

    #[test]
    fn malformed_ids_name_the_resource() {
        assert_eq!(parse_job_id("42").unwrap_err().detail(), INVALID_JOB_ID);
        assert_eq!(
            parse_candidate_id("not-a-uuid").unwrap_err().detail(),
            INVALID_CANDIDATE_ID
        );
    }

    #[tokio::test]
    async fn slow_requests_time_out_with_detail() {
        use axum::{body::to_bytes, http::Request, http::StatusCode};
        use tower::ServiceExt;

        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let app = with_request_timeout(slow, Duration::from_millis(20));

        let res = app
            .oneshot(Request::get("/slow").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["detail"], "Request timed out");
    }

    #[tokio::test]
    async fn other_layer_errors_are_internal() {
        let err = handle_layer_error("boom".into()).await;
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "An unexpected error occurred");
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/jobs/",
            "/api/jobs/{id}",
            "/api/apply",
            "/api/candidates/{job_id}",
            "/api/candidate/status/{id}",
            "/api/dashboard/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
