use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::utils::validation::describe_errors;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("JSON body error: {0}")]
    JsonBody(#[from] JsonRejection),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::Validation(_)
            | Error::Multipart(_)
            | Error::JsonBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Error::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migrate(_)
            | Error::Internal(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller in the `detail` field.
    pub fn detail(&self) -> String {
        match self {
            Error::BadRequest(msg) | Error::NotFound(msg) | Error::Conflict(msg) => msg.clone(),
            Error::Validation(errors) => describe_errors(errors),
            Error::Multipart(err) => format!("Invalid multipart body: {}", err.body_text()),
            Error::JsonBody(err) => format!("Invalid request body: {}", err.body_text()),
            Error::TooManyRequests => "Too many requests, please retry shortly".to_string(),
            Error::RequestTimeout => "Request timed out".to_string(),
            _ => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}

impl From<MultipartRejection> for Error {
    fn from(err: MultipartRejection) -> Self {
        Error::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
