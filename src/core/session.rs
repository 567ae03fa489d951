//! # Session State
//!
//! Process-wide authentication status. One `SessionState` is created at
//! startup, wrapped in an `Arc`, and handed to every component that renders
//! differently for signed-in users.
//!
//! The status is a tagged variant rather than a flag plus an optional
//! token, so "logged in without a token" cannot be represented:
//!
//! ```text
//! LoggedOut ──login(token)──▶ LoggedIn { token }
//!     ▲                             │
//!     └────────── logout() ─────────┘
//! ```
//!
//! Changes are broadcast over a `tokio::sync::watch` channel. The TUI loop
//! checks its receiver once per iteration and redraws on change.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

use crate::core::credentials::{CredentialStore, TOKEN_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn { token: String },
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::LoggedIn { token } => Some(token),
            AuthState::LoggedOut => None,
        }
    }
}

pub struct SessionState {
    auth: watch::Sender<AuthState>,
    store: Arc<dyn CredentialStore>,
}

impl SessionState {
    /// Start logged out, regardless of what the store holds.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (auth, _) = watch::channel(AuthState::LoggedOut);
        Self { auth, store }
    }

    /// Resume the session persisted in `store`, if any.
    pub fn restore(store: Arc<dyn CredentialStore>) -> Self {
        let initial = match store.get(TOKEN_KEY) {
            Some(token) if !token.trim().is_empty() => AuthState::LoggedIn { token },
            _ => AuthState::LoggedOut,
        };
        info!("Session restored (logged_in={})", initial.is_logged_in());
        let (auth, _) = watch::channel(initial);
        Self { auth, store }
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth.borrow().is_logged_in()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    /// The token held by the session, if logged in.
    pub fn token(&self) -> Option<String> {
        self.auth.borrow().token().map(str::to_string)
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.store.clone()
    }

    pub fn login(&self, token: String) {
        if let Err(e) = self.store.set(TOKEN_KEY, &token) {
            warn!("Failed to persist credential token: {}", e);
        }
        info!("Session logged in");
        self.auth.send_replace(AuthState::LoggedIn { token });
    }

    /// Clear the credential and switch to `LoggedOut`. Never fails; a store
    /// error is logged and the in-memory state still transitions.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("Failed to clear credential token: {}", e);
        }
        let previous = self.auth.send_replace(AuthState::LoggedOut);
        if previous.is_logged_in() {
            info!("Session logged out");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth.subscribe()
    }
}
