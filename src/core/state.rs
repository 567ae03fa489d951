//! # Application State
//!
//! Core business state for Roadtrip. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── trips: Vec<Trip>          // the displayed collection (owned here)
//! ├── error: Option<String>     // error surface, shown until cleared
//! ├── route: Route              // current screen
//! ├── logged_in: bool           // mirror of SessionState for routing
//! ├── loading: bool             // trip list fetch in flight
//! └── status_message: String    // footer text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::route::Route;
use crate::core::trip::{Trip, TripId};

pub struct App {
    pub trips: Vec<Trip>,
    pub error: Option<String>,
    pub route: Route,
    pub logged_in: bool,
    pub loading: bool,
    pub status_message: String,
}

impl App {
    pub fn new(logged_in: bool) -> Self {
        Self {
            trips: Vec::new(),
            error: None,
            route: if logged_in {
                Route::Dashboard
            } else {
                Route::Home
            },
            logged_in,
            loading: false,
            status_message: String::from("Welcome to Roadtrip.ai!"),
        }
    }

    pub fn trip(&self, id: TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_trip;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new(false);
        assert_eq!(app.route, Route::Home);
        assert!(app.trips.is_empty());
        assert!(app.error.is_none());
        assert_eq!(app.status_message, "Welcome to Roadtrip.ai!");
    }

    #[test]
    fn test_logged_in_starts_on_dashboard() {
        assert_eq!(App::new(true).route, Route::Dashboard);
    }

    #[test]
    fn test_trip_lookup() {
        let mut app = App::new(true);
        app.trips = vec![sample_trip(1), sample_trip(2)];
        assert_eq!(app.trip(2).map(|t| t.id), Some(2));
        assert!(app.trip(3).is_none());
    }
}
