use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side record behind a session cookie.
///
/// `tokens` is set once the authorization code has been exchanged; `user` is
/// set once identity claims have been resolved. Only `user` makes the session
/// authenticated: a record can hold tokens without a user when the user-info
/// request failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub tokens: Option<TokenSet>,
    pub user: Option<UserInfo>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            tokens: None,
            user: None,
            created_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens issued by the identity provider, opaque to the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Identity claims returned by the provider's user-info endpoint.
///
/// Claims other than the ones named here are kept as-is so the browser sees
/// what the provider returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    /// Stable identifier of the user: `sub`, else `username`
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().or(self.username.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_keeps_extra_claims() {
        let raw = json!({
            "sub": "b0c1",
            "username": "alice",
            "email": "alice@example.com",
            "email_verified": "true"
        });
        let user: UserInfo = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(user.subject(), Some("b0c1"));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_subject_falls_back_to_username() {
        let user: UserInfo = serde_json::from_value(json!({"username": "alice"})).unwrap();
        assert_eq!(user.subject(), Some("alice"));

        let user: UserInfo = serde_json::from_value(json!({"email": "a@b.c"})).unwrap();
        assert_eq!(user.subject(), None);
    }

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new();
        assert!(session.user.is_none());
        assert!(session.tokens.is_none());
    }
}
