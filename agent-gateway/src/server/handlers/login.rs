use axum::{extract::State, response::Response};

use super::redirect_found;
use crate::server::{error::ServerError, AppState};

/// Send the browser to the provider's hosted login page.
///
/// Reads and writes no session state.
pub async fn login(State(state): State<AppState>) -> Result<Response, ServerError> {
    let login_url = state.provider.login_url()?;

    tracing::debug!("Redirecting to provider login");

    Ok(redirect_found(&login_url))
}
