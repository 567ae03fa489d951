//! # Routes
//!
//! Client-side screens, addressed by path the same way the web client
//! addresses them. Components that navigate do so through the injected
//! [`Navigator`] capability, never by touching app state directly.

use std::fmt;

use crate::core::trip::TripId;

pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Dashboard,
    Login,
    SignUp,
    Trip(TripId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::Login => "/login".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::Trip(id) => format!("/trips/{id}"),
        }
    }

    /// Parse a path. Unknown paths yield `None`; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match trimmed {
            "/" | "" => Some(Route::Home),
            DASHBOARD_PATH => Some(Route::Dashboard),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::SignUp),
            other => other
                .strip_prefix("/trips/")
                .and_then(|id| id.parse().ok())
                .map(Route::Trip),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Performs client-side navigation. No result is reported back.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
