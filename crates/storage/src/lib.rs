use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::domain::{SessionId, SessionState};
use tokio::sync::RwLock;
use tracing::debug;

/// Keeps each respondent's answers between requests.
///
/// `get` never fails for an unknown id; it hands back an empty session
/// instead. `put` replaces whatever was stored (last writer wins).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Live session for `session_id`, or `None` if it was never stored or
    /// has expired.
    async fn find(&self, session_id: &SessionId) -> Result<Option<SessionState>>;
    async fn put(&self, session_id: &SessionId, state: SessionState) -> Result<()>;
    /// Drops sessions idle for longer than the store's TTL and returns how
    /// many were removed.
    async fn purge_expired(&self) -> Result<usize>;

    async fn get(&self, session_id: &SessionId) -> Result<SessionState> {
        Ok(self
            .find(session_id)
            .await?
            .unwrap_or_else(|| SessionState::empty(session_id.clone())))
    }

    async fn contains(&self, session_id: &SessionId) -> Result<bool> {
        Ok(self.find(session_id).await?.is_some())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionState>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    /// A zero `ttl` keeps sessions for the life of the process.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired ones included until purged.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, state: &SessionState, now: DateTime<Utc>) -> bool {
        self.ttl > Duration::zero() && now - state.updated_at >= self.ttl
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find(&self, session_id: &SessionId) -> Result<Option<SessionState>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .filter(|state| !self.is_expired(state, Utc::now()))
            .cloned())
    }

    async fn put(&self, session_id: &SessionId, mut state: SessionState) -> Result<()> {
        state.session_id = session_id.clone();
        state.updated_at = Utc::now();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), state);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, state| !self.is_expired(state, now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "purged expired sessions");
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
