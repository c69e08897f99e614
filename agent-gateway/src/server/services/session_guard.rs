use axum_extra::extract::CookieJar;

use super::session_store::{redact, SessionStore};
use crate::server::error::ServerError;
use crate::server::models::{Session, UserInfo};

/// Outcome of checking a session before a protected operation
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allowed(UserInfo),
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No cookie, or the cookie points at no live record
    NoSession,
    /// A record exists but identity was never resolved
    NotAuthenticated,
}

/// Decide whether a session may use protected operations.
///
/// Keys off `user` only; a record holding tokens without a user (user-info
/// lookup failed after the code exchange) is denied.
pub fn guard(session: Option<&Session>) -> Access {
    match session {
        None => Access::Denied(DenyReason::NoSession),
        Some(Session { user: Some(user), .. }) => Access::Allowed(user.clone()),
        Some(_) => Access::Denied(DenyReason::NotAuthenticated),
    }
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed(_))
    }

    /// JSON API flavour: denial becomes a 401 body
    pub fn into_api_result(self) -> Result<UserInfo, ServerError> {
        match self {
            Access::Allowed(user) => Ok(user),
            Access::Denied(reason) => {
                tracing::debug!(?reason, "Rejected unauthenticated API request");
                Err(ServerError::Unauthenticated)
            }
        }
    }
}

/// Session id from the cookie and the record it points at, if any.
///
/// A failing store reads as an anonymous session.
pub async fn load_session(
    store: &dyn SessionStore,
    jar: &CookieJar,
    cookie_name: &str,
) -> (Option<String>, Option<Session>) {
    let Some(session_id) = jar.get(cookie_name).map(|c| c.value().to_string()) else {
        return (None, None);
    };

    match store.get(&session_id).await {
        Ok(session) => (Some(session_id), session),
        Err(e) => {
            tracing::error!(session = %redact(&session_id), error = %e, "Failed to load session");
            (Some(session_id), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::models::TokenSet;

    fn alice() -> UserInfo {
        UserInfo {
            sub: None,
            username: Some("alice".to_string()),
            email: None,
            claims: Default::default(),
        }
    }

    #[test]
    fn test_no_session_is_denied() {
        assert_eq!(guard(None), Access::Denied(DenyReason::NoSession));
    }

    #[test]
    fn test_tokens_without_user_are_denied() {
        let mut session = Session::new();
        session.tokens = Some(TokenSet {
            access_token: "at".to_string(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            id_token: None,
            expires_at: None,
        });

        let access = guard(Some(&session));
        assert_eq!(access, Access::Denied(DenyReason::NotAuthenticated));
        assert!(matches!(
            access.into_api_result(),
            Err(ServerError::Unauthenticated)
        ));
    }

    #[test]
    fn test_user_is_allowed() {
        let mut session = Session::new();
        session.user = Some(alice());

        let access = guard(Some(&session));
        assert!(access.is_allowed());
        assert_eq!(access.into_api_result().unwrap(), alice());
    }
}
