//! Browser session storage.
//!
//! Sessions live in memory and are keyed by a random id carried in a cookie.
//! Handlers take an owned [`SessionCredentials`] snapshot, so transfers never
//! hold a reference into the shared store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::credentials::{Credential, CredentialProvider, OAuthToken};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "dmbridge_session";

/// Default idle lifetime of a session (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Tokens collected for one browser session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Full-scope data-management token (server side only).
    pub dm_internal: Option<OAuthToken>,
    /// Limited-scope data-management token for the browser viewer.
    pub dm_public: Option<OAuthToken>,
    /// Box token.
    pub box_token: Option<OAuthToken>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last time the session was used.
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            dm_internal: None,
            dm_public: None,
            box_token: None,
            created_at: now,
            last_seen: now,
        }
    }

    /// Check if the session has been idle longer than `ttl`.
    pub fn is_idle(&self, ttl: Duration) -> bool {
        Utc::now() - self.last_seen >= ttl
    }
}

/// Owned credential snapshot of a session, valid for a single request.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    /// Session id, if the request carried a known session cookie.
    pub session_id: Option<String>,
    dm_internal: Option<OAuthToken>,
    dm_public: Option<OAuthToken>,
    box_token: Option<OAuthToken>,
}

impl SessionCredentials {
    /// Snapshot of an existing session.
    pub fn from_session(id: &str, session: &Session) -> Self {
        Self {
            session_id: Some(id.to_string()),
            dm_internal: session.dm_internal.clone(),
            dm_public: session.dm_public.clone(),
            box_token: session.box_token.clone(),
        }
    }

    /// Snapshot for a request without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl CredentialProvider for SessionCredentials {
    fn data_management_credentials(&self) -> Option<Credential> {
        self.dm_internal.as_ref().and_then(OAuthToken::credential)
    }

    fn public_credentials(&self) -> Option<Credential> {
        self.dm_public.as_ref().and_then(OAuthToken::credential)
    }

    fn box_credentials(&self) -> Option<Credential> {
        self.box_token.as_ref().and_then(OAuthToken::credential)
    }
}

/// In-memory session store shared by all handlers.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_SECS)
    }
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl_secs` of inactivity.
    ///
    /// Values past what a [`Duration`] can hold mean sessions never go idle.
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Create an empty session and return its id.
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), Session::new());
        debug!(session_id = %id, "Session created");
        id
    }

    /// Look up a live session and refresh its idle timer.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        if session.is_idle(self.ttl) {
            sessions.remove(id);
            return None;
        }
        session.last_seen = Utc::now();
        Some(session.clone())
    }

    /// Credential snapshot for `id`, or an anonymous snapshot.
    pub async fn credentials(&self, id: Option<&str>) -> SessionCredentials {
        match id {
            Some(id) => match self.get(id).await {
                Some(session) => SessionCredentials::from_session(id, &session),
                None => SessionCredentials::anonymous(),
            },
            None => SessionCredentials::anonymous(),
        }
    }

    /// Apply `update` to the session, creating it if `id` is unknown.
    ///
    /// Returns the id of the updated session.
    pub async fn update<F>(&self, id: Option<&str>, update: F) -> String
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let id = match id {
            Some(id) if sessions.contains_key(id) => id.to_string(),
            _ => {
                let id = Uuid::new_v4().to_string();
                sessions.insert(id.clone(), Session::new());
                id
            }
        };

        if let Some(session) = sessions.get_mut(&id) {
            update(session);
            session.last_seen = Utc::now();
        }
        id
    }

    /// Destroy a session.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop idle sessions. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(self.ttl));
        before - sessions.len()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
