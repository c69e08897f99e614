use axum::{extract::State, response::Response};
use axum_extra::extract::CookieJar;

use super::redirect_found;
use crate::server::{cookies, services::session_store::redact, AppState};

/// Destroy the local session, then hand the browser to the provider's logout.
///
/// Always redirects, even when the store fails to delete the record.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Response) {
    let cookie_config = &state.configuration.cookie;

    if let Some(cookie) = jar.get(&cookie_config.name) {
        let session_id = cookie.value().to_string();
        match state.session_store.destroy(&session_id).await {
            Ok(()) => tracing::info!(session = %redact(&session_id), "Session destroyed on logout"),
            Err(e) => tracing::warn!(
                session = %redact(&session_id),
                error = %e,
                "Session deletion failed during logout"
            ),
        }
    }

    let logout_url = state.provider.logout_url().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Could not build provider logout URL");
        state.configuration.app.origin.clone()
    });

    let jar = jar.remove(cookies::clear_session_cookie(cookie_config));
    (jar, redirect_found(&logout_url))
}
