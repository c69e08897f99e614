use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::JobStatus;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const JOB_SUBMISSION_FAILED: &str = "Failed to start AI job.";
pub const JOB_STATUS_UNAVAILABLE: &str = "Could not retrieve job status.";

/// Errors surfaced to the browser.
///
/// Upstream detail is logged where the error is raised and never carried in
/// the response body. Identity provider failures never get here: the callback
/// answers them with a redirect.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Job submission failed")]
    JobSubmissionFailed,

    #[error("Job status unavailable")]
    JobStatusUnavailable,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::InvalidCallback(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED.to_string())
            }
            ServerError::JobSubmissionFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                JOB_SUBMISSION_FAILED.to_string(),
            ),
            // Pollers always get a status-shaped body
            ServerError::JobStatusUnavailable => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(JobStatus::failed(JOB_STATUS_UNAVAILABLE)),
                )
                    .into_response();
            }
            ServerError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
