use axum::{extract::State, response::Response, Json};
use axum_extra::extract::CookieJar;

use super::redirect_found;
use crate::common::AuthStatusResponse;
use crate::server::{
    services::{guard, load_session},
    AppState,
};

/// Identity of the current session, `null` when anonymous
pub async fn auth_status(State(state): State<AppState>, jar: CookieJar) -> Json<AuthStatusResponse> {
    let (_, session) = load_session(
        state.session_store.as_ref(),
        &jar,
        &state.configuration.cookie.name,
    )
    .await;

    let user = session
        .and_then(|s| s.user)
        .and_then(|user| serde_json::to_value(user).ok());

    Json(AuthStatusResponse { user })
}

/// Browser entry point: authenticated sessions go to the application,
/// everyone else is sent through login.
pub async fn entry(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (_, session) = load_session(
        state.session_store.as_ref(),
        &jar,
        &state.configuration.cookie.name,
    )
    .await;

    if guard(session.as_ref()).is_allowed() {
        redirect_found(&state.configuration.app.origin)
    } else {
        redirect_found("/login")
    }
}
