use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::server::models::Session;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage for session records, keyed by the id carried in the session cookie.
///
/// Implementations own expiry: a record past its lifetime must read as `None`.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, SessionStoreError>;

    async fn set(&self, session_id: &str, session: Session) -> Result<(), SessionStoreError>;

    async fn destroy(&self, session_id: &str) -> Result<(), SessionStoreError>;
}

/// Generate a new opaque session id (256 random bits, URL-safe base64)
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
    base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(&random_bytes)
}

/// Shortened session id for log fields
pub fn redact(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}

/// In-process session store backed by a concurrent map
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        let store = Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        };

        // Spawn background cleanup task
        let sessions_clone = store.sessions.clone();
        let ttl_clone = store.ttl;
        tokio::spawn(async move {
            cleanup_expired_sessions(sessions_clone, ttl_clone).await;
        });

        tracing::info!(
            "Session store initialized with TTL of {} seconds",
            ttl_seconds
        );
        store
    }

    /// Get session count (for monitoring)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, SessionStoreError> {
        let session = self
            .sessions
            .get(session_id)
            .map(|s| s.clone())
            .filter(|s| !is_expired(s, self.ttl));
        Ok(session)
    }

    async fn set(&self, session_id: &str, session: Session) -> Result<(), SessionStoreError> {
        self.sessions.insert(session_id.to_string(), session);
        tracing::debug!(session = %redact(session_id), "Session saved");
        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.sessions.remove(session_id);
        tracing::debug!(session = %redact(session_id), "Session destroyed");
        Ok(())
    }
}

fn is_expired(session: &Session, ttl: Duration) -> bool {
    let age = Utc::now()
        .signed_duration_since(session.created_at)
        .to_std()
        .unwrap_or(Duration::ZERO);
    age >= ttl
}

/// Background task that periodically cleans up expired sessions
async fn cleanup_expired_sessions(sessions: Arc<DashMap<String, Session>>, ttl: Duration) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        let initial_count = sessions.len();

        sessions.retain(|session_id, session| {
            if is_expired(session, ttl) {
                tracing::debug!(session = %redact(session_id), "Cleaning up expired session");
                false
            } else {
                true
            }
        });

        let cleaned = initial_count.saturating_sub(sessions.len());
        if cleaned > 0 {
            tracing::info!(
                "Cleaned up {} expired sessions, {} remaining",
                cleaned,
                sessions.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::models::UserInfo;

    #[tokio::test]
    async fn test_set_get_destroy() {
        let store = MemorySessionStore::new(60);
        let id = generate_session_id();

        assert!(store.get(&id).await.unwrap().is_none());

        let mut session = Session::new();
        session.user = Some(UserInfo {
            sub: None,
            username: Some("alice".to_string()),
            email: None,
            claims: Default::default(),
        });
        store.set(&id, session).await.unwrap();

        let loaded = store.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.user.unwrap().subject(), Some("alice"));
        assert_eq!(store.session_count(), 1);

        store.destroy(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_reads_as_missing() {
        let store = MemorySessionStore::new(60);
        let mut session = Session::new();
        session.created_at = Utc::now() - chrono::Duration::seconds(120);

        store.set("old", session).await.unwrap();
        assert!(store.get("old").await.unwrap().is_none());
    }

    #[test]
    fn test_session_ids_are_unique_and_url_safe() {
        let a = generate_session_id();
        let b = generate_session_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("abcdefghijkl"), "abcdefgh");
        assert_eq!(redact("abc"), "abc");
    }
}
