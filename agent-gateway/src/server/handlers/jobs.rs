use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use axum_extra::extract::CookieJar;
use tracing::Instrument;

use crate::common::{SubmitJobRequest, SubmitJobResponse};
use crate::server::{
    error::ServerError,
    services::{guard, load_session},
    AppState,
};

async fn require_user(state: &AppState, jar: &CookieJar) -> Result<String, ServerError> {
    let (_, session) = load_session(
        state.session_store.as_ref(),
        jar,
        &state.configuration.cookie.name,
    )
    .await;

    let user = guard(session.as_ref()).into_api_result()?;
    Ok(user.subject().unwrap_or_default().to_string())
}

/// Forward a job to the agent selected by `agentType` and return its id
pub async fn submit_job(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<SubmitJobRequest>, JsonRejection>,
) -> Result<Json<SubmitJobResponse>, ServerError> {
    // Authentication is checked before the body is looked at
    let user = require_user(&state, &jar).await?;
    let Json(req) = body.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

    let span = tracing::info_span!("submit_job", agent = %req.agent_type, user = %user);

    async {
        let job_id = state
            .job_backend
            .submit(req.agent_type, &req.query)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error starting job");
                ServerError::JobSubmissionFailed
            })?;

        tracing::info!(job_id = %job_id, "Job submitted");

        Ok::<_, ServerError>(Json(SubmitJobResponse { job_id }))
    }
    .instrument(span)
    .await
}

/// Relay the backend's status body for a job.
///
/// Any upstream failure is answered with a `FAILED` status so pollers always
/// receive a status-shaped body.
pub async fn job_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    require_user(&state, &jar).await?;

    let span = tracing::info_span!("job_status", job_id = %job_id);

    async {
        let body = state.job_backend.status(&job_id).await.map_err(|e| {
            tracing::warn!(error = %e, "Could not retrieve job status");
            ServerError::JobStatusUnavailable
        })?;

        Ok::<_, ServerError>(Json(body))
    }
    .instrument(span)
    .await
}
