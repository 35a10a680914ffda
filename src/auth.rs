use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{ADMIN_ROLE, User},
    store::MovieStore,
};

pub const SESSION_COOKIE: &str = "cine_session";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
    expires_at: i64,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// In-memory login sessions keyed by an opaque random token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl_seconds: i64,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self { sessions: Arc::default(), ttl_seconds: ttl_minutes.saturating_mul(60) }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub async fn issue(&self, user: &User) -> Session {
        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            expires_at: now_sec().saturating_add(self.ttl_seconds),
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now_sec());
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    pub async fn resolve(&self, token: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if s.expires_at > now_sec() => return Some(s.clone()),
                Some(_) => {},
                None => return None,
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// Exact, plaintext comparison against the stored credentials.
pub async fn login(store: &dyn MovieStore, username: &str, password: &str) -> AppResult<User> {
    if username.is_empty() || password.is_empty() {
        tracing::info!(username, "rejected login without credentials");
        return Err(AppError::InvalidCredentials);
    }
    match store.find_user(username, password).await? {
        Some(user) => Ok(user),
        None => {
            tracing::info!(username, "rejected login");
            Err(AppError::InvalidCredentials)
        },
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: 1,
            username: "ana".into(),
            password: "pw".into(),
            role: role.into(),
            created_at: String::new(),
        }
    }

    #[tokio::test]
    async fn issued_sessions_resolve_until_revoked() {
        let store = SessionStore::new(5);
        let session = store.issue(&user("admin")).await;
        assert!(session.is_admin());

        let resolved = store.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.username, "ana");

        assert!(store.revoke(&session.token).await);
        assert!(store.resolve(&session.token).await.is_none());
        assert!(!store.revoke(&session.token).await);
    }

    #[tokio::test]
    async fn expired_sessions_are_dropped() {
        let store = SessionStore { sessions: Arc::default(), ttl_seconds: -1 };
        let session = store.issue(&user("user")).await;
        assert!(store.resolve(&session.token).await.is_none());
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn huge_ttl_does_not_overflow() {
        let store = SessionStore::new(i64::MAX);
        assert_eq!(store.ttl_seconds(), i64::MAX);
        let session = store.issue(&user("admin")).await;
        assert!(store.resolve(&session.token).await.is_some());
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let store = SessionStore::new(5);
        let a = store.issue(&user("user")).await;
        let b = store.issue(&user("user")).await;
        assert_ne!(a.token, b.token);
    }
}
