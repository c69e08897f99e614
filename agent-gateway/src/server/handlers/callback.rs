use axum::{
    extract::{Query, State},
    response::Response,
};
use axum_extra::extract::CookieJar;

use super::redirect_found;
use crate::server::{
    cookies,
    error::ServerError,
    models::{CallbackParams, Session},
    services::session_store::{generate_session_id, redact},
    AppState,
};

/// Complete the authorization code flow.
///
/// Exchanges the code for tokens, stores them under a fresh session id, then
/// resolves the user's identity. Every upstream failure ends on the
/// application landing page; only a missing code is answered with an error.
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Response), ServerError> {
    let landing = redirect_found(&state.configuration.app.origin);

    // Provider-side failure, e.g. the user cancelled on the hosted page
    if let Some(error) = &params.error {
        let description = params.error_description.as_deref().unwrap_or("none");
        tracing::warn!(error = %error, description = %description, "OAuth callback error");
        return Ok((jar, landing));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ServerError::InvalidCallback("Missing authorization code".to_string()))?;

    let tokens = match state.provider.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            return Ok((jar, landing));
        }
    };

    let cookie_config = &state.configuration.cookie;
    let previous_id = jar.get(&cookie_config.name).map(|c| c.value().to_string());
    let session_id = generate_session_id();

    let session_tag = redact(&session_id).to_string();

    let access_token = tokens.access_token.clone();
    let mut session = Session::new();
    session.tokens = Some(tokens);

    if let Err(e) = state.session_store.set(&session_id, session.clone()).await {
        tracing::error!(session = %session_tag, error = %e, "Failed to store tokens in session");
        return Ok((jar, landing));
    }

    // A fresh id per login; the pre-login record, if any, is dropped
    if let Some(previous_id) = previous_id {
        if let Err(e) = state.session_store.destroy(&previous_id).await {
            tracing::warn!(error = %e, "Failed to destroy previous session");
        }
    }

    let jar = jar.add(cookies::session_cookie(
        cookie_config,
        &session_id,
        state.configuration.server.session_ttl_seconds,
    ));

    let user = match state.provider.fetch_user_info(&access_token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(session = %session_tag, error = %e, "User info request failed");
            return Ok((jar, landing));
        }
    };

    let subject = user.subject().unwrap_or_default().to_string();
    session.user = Some(user);

    if let Err(e) = state.session_store.set(&session_id, session).await {
        tracing::error!(session = %session_tag, error = %e, "Failed to store user in session");
        return Ok((jar, landing));
    }

    tracing::info!(session = %session_tag, user = %subject, "Login successful");

    Ok((jar, landing))
}
