#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use recruitment_portal::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub const BOUNDARY: &str = "portal-test-boundary";
pub const PDF: &str = "application/pdf";

pub fn app() -> Router {
    app_with(Config::default())
}

pub fn app_with(config: Config) -> Router {
    routes::router(AppState::in_memory(), &config)
}

pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let res = app.clone().oneshot(req).await.expect("router response");
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, headers, body)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let (status, _, body) = send_raw(app, req).await;
    if body.is_empty() {
        return (status, JsonValue::Null);
    }
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn job_body(title: &str) -> JsonValue {
    json!({
        "job_title": title,
        "department": "Engineering",
        "skills": ["Go", "SQL"],
        "experience": "2-4 years",
        "salary": "$70k-$90k",
        "location": "Remote"
    })
}

pub async fn create_job(app: &Router, title: &str) -> JsonValue {
    let (status, job) = send(app, json_request("POST", "/api/jobs/", &job_body(title))).await;
    assert_eq!(status, StatusCode::CREATED, "create job: {}", job);
    job
}

pub struct ResumeFile<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: Vec<u8>,
}

pub fn pdf_of_size(len: usize) -> ResumeFile<'static> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len.max(data.len()), b'0');
    ResumeFile {
        filename: "resume.pdf",
        content_type: PDF,
        data,
    }
}

/// Hand-built `multipart/form-data` body for `POST /api/apply`.
pub fn apply_request(fields: &[(&str, &str)], resume: Option<ResumeFile<'_>>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = resume {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\n",
                file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/apply")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub fn applicant<'a>(job_id: &'a str, email: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", "Asha Rao"),
        ("email", email),
        ("phone", "555-0100"),
        ("job_id", job_id),
    ]
}
