//! Session state
//!
//! A minimal cookie session used to host flash messages. Session data is
//! loaded from a [`SessionStore`] by
//! [`SessionMiddleware`](crate::middleware::SessionMiddleware), shared with
//! handlers through the [`Session`] handle, and saved after the handler
//! returns.

mod store;

pub use store::{MemoryStore, SessionStore};

use crate::flash::{FlashDictionary, FlashSession};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Errors raised by session handling
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session id is not a valid identifier
    #[error("Invalid session id: {0}")]
    InvalidId(String),

    /// Value could not be (de)serialized
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend failed
    #[error("Session store error: {0}")]
    Store(String),
}

/// Opaque session identifier carried in the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(|id| Self(id.to_string()))
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data stored for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Arbitrary application values
    #[serde(default)]
    pub values: HashMap<String, serde_json::Value>,
    /// Reserved slot for flash messages; `None` when there are none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashDictionary>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// Create empty session data with a 24 hour lifetime
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(24))
    }

    /// Create empty session data expiring after `ttl`
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            values: HashMap::new(),
            flash: None,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check whether the session has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Extend the expiration to `ttl` from now
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }

    /// Whether the session holds nothing worth persisting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.flash.is_none()
    }

    /// Get a typed value
    #[must_use]
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Set a typed value
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized
    pub fn set<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), SessionError> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the current request's session
///
/// Cloning the handle shares the underlying data, so changes made by a
/// handler are seen by the session middleware when it persists the
/// session.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    data: Arc<Mutex<SessionData>>,
}

impl Session {
    /// Wrap loaded session data
    #[must_use]
    pub fn new(id: SessionId, data: SessionData) -> Self {
        Self {
            id,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// The session id
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Copy of the current session data
    #[must_use]
    pub fn data(&self) -> SessionData {
        self.data.lock().clone()
    }

    /// Run `f` with mutable access to the session data
    pub fn with_data<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        f(&mut self.data.lock())
    }

    /// Get a typed value
    #[must_use]
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.lock().get(key)
    }

    /// Set a typed value
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized
    pub fn set<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), SessionError> {
        self.data.lock().set(key, value)
    }

    /// Remove a value
    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        self.data.lock().remove(key)
    }
}

impl FlashSession for Session {
    fn with_flash_slot<R>(&self, f: impl FnOnce(&mut Option<FlashDictionary>) -> R) -> R {
        f(&mut self.data.lock().flash)
    }
}
