//! Session persistence.
//!
//! [`SessionBackend`] loads and saves [`SessionData`] between requests.
//! Loading marks a request boundary, so backends age flash values on load;
//! the aging sticks once the session is saved again.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use formkit_core::{FormError, Settings};

use crate::cookie::SessionCookie;
use crate::session::SessionData;

/// A backend for storing and retrieving session data.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Loads session data for the given session key, aging its flash values.
    async fn load(&self, session_key: &str) -> Result<SessionData, FormError>;

    /// Saves session data and returns the session key.
    async fn save(&self, session: &SessionData) -> Result<String, FormError>;

    /// Deletes a session by its key.
    async fn delete(&self, session_key: &str) -> Result<(), FormError>;

    /// Checks whether a live session with the given key exists.
    async fn exists(&self, session_key: &str) -> Result<bool, FormError>;

    /// Removes all expired sessions.
    async fn clear_expired(&self) -> Result<(), FormError>;
}

/// An in-memory session backend, suitable for tests and single-process apps.
#[derive(Debug, Clone)]
pub struct InMemorySessionBackend {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    cookie: SessionCookie,
}

impl Default for InMemorySessionBackend {
    fn default() -> Self {
        Self::with_cookie(SessionCookie::default())
    }
}

impl InMemorySessionBackend {
    /// Creates a new in-memory session backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose new sessions live as long as `cookie` says.
    pub fn with_cookie(cookie: SessionCookie) -> Self {
        Self {
            sessions: Arc::default(),
            cookie,
        }
    }

    /// Creates a backend configured from the session cookie settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_cookie(SessionCookie::from_settings(settings))
    }

    /// Returns the session cookie configuration.
    pub const fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    /// Loads the session for `session_key`, or starts a fresh one with a new
    /// key when it is missing or expired.
    pub async fn load_or_create(&self, session_key: Option<&str>) -> SessionData {
        if let Some(key) = session_key {
            if let Ok(session) = self.load(key).await {
                return session;
            }
            tracing::debug!(session_key = key, "session missing or expired, starting a new one");
        }
        self.cookie.new_session()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn load(&self, session_key: &str) -> Result<SessionData, FormError> {
        let sessions = self.sessions.read().await;
        let mut session = sessions
            .get(session_key)
            .filter(|s| !s.is_expired())
            .cloned()
            .ok_or_else(|| FormError::SessionNotFound(session_key.to_string()))?;
        session.age_flash();
        session.modified = false;
        Ok(session)
    }

    async fn save(&self, session: &SessionData) -> Result<String, FormError> {
        let key = session.session_key.clone();
        self.sessions
            .write()
            .await
            .insert(key.clone(), session.clone());
        Ok(key)
    }

    async fn delete(&self, session_key: &str) -> Result<(), FormError> {
        self.sessions.write().await.remove(session_key);
        Ok(())
    }

    async fn exists(&self, session_key: &str) -> Result<bool, FormError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_key).is_some_and(|s| !s.is_expired()))
    }

    async fn clear_expired(&self) -> Result<(), FormError> {
        self.sessions
            .write()
            .await
            .retain(|_, session| !session.is_expired());
        Ok(())
    }
}

/// Generates a random session key.
pub fn generate_session_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
