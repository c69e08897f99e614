mod callback;
mod jobs;
mod login;
mod logout;
mod status;

pub use callback::oauth_callback;
pub use jobs::{job_status, submit_job};
pub use login::login;
pub use logout::logout;
pub use status::{auth_status, entry};

use crate::server::models::HealthResponse;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 302 Found, the redirect browsers follow with a GET
pub(crate) fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
