//! Session - the logged-in staff member's credential and role
//!
//! A [`SessionStore`] is created once and handed to every component that
//! talks to the backend. Login fills it, logout clears it; nothing reads
//! credentials from anywhere else.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::models::{Role, Screen};
use std::sync::Arc;

/// Authenticated session data
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    /// Bearer token for HTTP API authentication
    pub token: String,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>, token: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            role,
            logged_in_at: Utc::now(),
        }
    }

    /// Capability check for the navigation layer
    pub fn can_access(&self, screen: Screen) -> bool {
        self.role.can_access(screen)
    }
}

/// Shared, cloneable handle to the current session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Creates an empty store (logged out)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that starts logged in
    pub fn with_session(session: Session) -> Self {
        let store = Self::new();
        store.set(session);
        store
    }

    /// Replaces the current session (login)
    pub fn set(&self, session: Session) {
        *self.inner.write() = Some(session);
    }

    /// Drops the current session (logout), returning it
    pub fn clear(&self) -> Option<Session> {
        self.inner.write().take()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.read().as_ref().map(|s| s.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Logged-out sessions may open nothing
    pub fn can_access(&self, screen: Screen) -> bool {
        self.role().is_some_and(|role| role.can_access(screen))
    }
}
