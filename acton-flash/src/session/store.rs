//! Session storage backends

use super::{SessionData, SessionError, SessionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Storage backend for session data
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Load a session, returning `None` if it does not exist or has expired
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError>;

    /// Persist a session
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), SessionError>;

    /// Remove a session
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    async fn delete(&self, id: &SessionId) -> Result<(), SessionError>;
}

/// In-memory session store
///
/// Suitable for development, tests, and single-instance deployments.
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, including expired ones not yet removed
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the store holds no sessions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop every expired session, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired());
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::debug!(removed, "Cleaned up expired sessions");
        }
        removed
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        let sessions = self.sessions.read();
        Ok(sessions.get(id).filter(|data| !data.is_expired()).cloned())
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), SessionError> {
        self.sessions.write().insert(id.clone(), data.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.write().remove(id);
        Ok(())
    }
}
