pub mod config;
mod cookies;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Configuration;
pub use error::ServerError;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use services::{JobBackendClient, ProviderClient, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Arc<Configuration>,
    pub session_store: Arc<dyn SessionStore>,
    pub provider: Arc<ProviderClient>,
    pub job_backend: Arc<JobBackendClient>,
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        session_store: Arc<dyn SessionStore>,
    ) -> Result<Self, ServerError> {
        configuration.validate().map_err(ServerError::Configuration)?;

        let timeout = Duration::from_secs(configuration.server.request_timeout_seconds);
        let provider = ProviderClient::new(&configuration.provider, &configuration.app, timeout)?;
        let job_backend = JobBackendClient::new(&configuration.backend, timeout)?;

        Ok(Self {
            configuration: Arc::new(configuration),
            session_store,
            provider: Arc::new(provider),
            job_backend: Arc::new(job_backend),
        })
    }
}

/// Build the gateway's HTTP surface
pub fn router(state: AppState) -> Result<Router, ServerError> {
    let origin = HeaderValue::from_str(&state.configuration.app.origin)
        .map_err(|e| ServerError::Configuration(format!("Invalid app origin: {}", e)))?;

    // Cookies only travel cross-origin with an exact origin and credentials
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .route("/", get(handlers::entry))
        .route("/health", get(handlers::health_check))
        .route("/login", get(handlers::login))
        .route("/auth/callback", get(handlers::oauth_callback))
        .route("/logout", get(handlers::logout))
        .route("/api/auth/status", get(handlers::auth_status))
        .route("/api/submit-job", post(handlers::submit_job))
        .route("/api/status/{job_id}", get(handlers::job_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors),
        )
        .with_state(state);

    Ok(router)
}
