use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::ApiError;

/// Per-session state. `user_id` is only ever set by a successful login;
/// `token` is informational and never consulted for authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<i64>,
    pub token: Option<String>,
    pub updated_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session backend unavailable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError>;

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError>;

    async fn remove(&self, id: &str) -> Result<(), SessionError>;

    /// Drop sessions not written within `max_age_secs`; returns how many went
    async fn prune(&self, max_age_secs: i64) -> Result<usize, SessionError>;
}

/// Session store held in process memory. Sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError> {
        let mut stored = data.clone();
        stored.updated_at = chrono::Utc::now().timestamp();
        self.sessions.write().await.insert(id.to_string(), stored);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn prune(&self, max_age_secs: i64) -> Result<usize, SessionError> {
        let cutoff = chrono::Utc::now().timestamp() - max_age_secs;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at > cutoff);
        Ok(before - sessions.len())
    }
}

/// The caller's session, handed to every action
#[derive(Clone)]
pub struct SessionContext {
    id: String,
    data: SessionData,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(id: String, data: SessionData, store: Arc<dyn SessionStore>) -> Self {
        Self { id, data, store }
    }

    /// A context for a session id the store has never seen
    pub fn fresh(store: Arc<dyn SessionStore>) -> Self {
        Self::new(new_session_id(), SessionData::default(), store)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> Option<i64> {
        self.data.user_id
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    /// The logged-in user, or 401 when the session carries none
    pub fn require_user(&self) -> Result<i64, ApiError> {
        self.data
            .user_id
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }

    /// Store a new token without authenticating the session
    pub async fn issue_token(&mut self, token: String) -> Result<(), SessionError> {
        self.data.token = Some(token);
        self.store.save(&self.id, &self.data).await
    }

    pub async fn login(&mut self, user_id: i64, token: String) -> Result<(), SessionError> {
        self.data.user_id = Some(user_id);
        self.data.token = Some(token);
        self.store.save(&self.id, &self.data).await
    }

    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if self.data.user_id.take().is_some() {
            self.store.save(&self.id, &self.data).await?;
        }
        Ok(())
    }
}

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn session_cookie(config: &SessionConfig, id: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), id))
        .http_only(true)
        .secure(config.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.max_age_secs))
        .path("/")
        .build()
}

/// Periodically drop sessions idle for longer than the configured max age
pub fn spawn_cleanup(store: Arc<dyn SessionStore>, config: &SessionConfig) -> JoinHandle<()> {
    let max_age = config.max_age_secs;
    let period = Duration::from_secs(config.cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match store.prune(max_age).await {
                Ok(0) => debug!("Session cleanup: nothing expired"),
                Ok(n) => info!("Session cleanup: removed {} expired sessions", n),
                Err(e) => tracing::error!("Session cleanup failed: {}", e),
            }
        }
    })
}
