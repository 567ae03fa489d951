//! # Actions
//!
//! Everything that can happen in Roadtrip becomes an `Action`.
//! User picks a trip? That's `Action::TripSelected(id)`.
//! Server confirms a delete? That's `Action::TripDeleted(id)`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the adapter must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::route::Route;
use crate::core::state::App;
use crate::core::trip::{Trip, TripId};

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load trips. Please try again or check your connection.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Re-fetch the trip list.
    Refresh,
    TripsLoaded(Vec<Trip>),
    TripsLoadFailed(String),
    /// The service rejected the credential.
    SessionExpired,
    TripSelected(TripId),
    /// The server confirmed the trip is gone.
    TripDeleted(TripId),
    /// A delete request for this trip finished, successfully or not.
    DeleteSettled(TripId),
    SetError(Option<String>),
    Navigate(Route),
    SessionChanged { logged_in: bool },
    Quit,
}

/// Side effects requested by `update`, performed by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    FetchTrips,
    Logout,
    SettleDelete(TripId),
}

fn requires_login(route: Route) -> bool {
    matches!(route, Route::Dashboard | Route::Trip(_))
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Refresh => {
            if !app.logged_in || app.loading {
                return Effect::None;
            }
            app.loading = true;
            app.status_message = "Loading trips...".to_string();
            Effect::FetchTrips
        }
        Action::TripsLoaded(trips) => {
            let received = trips.len();
            app.trips = trips
                .into_iter()
                .filter(|trip| match trip.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Hiding trip {}: {}", trip.id, e);
                        false
                    }
                })
                .collect();
            app.loading = false;
            app.status_message = format!("{} trips", app.trips.len());
            info!("Displaying {} of {} trips", app.trips.len(), received);
            Effect::None
        }
        Action::TripsLoadFailed(cause) => {
            warn!("Trip list fetch failed: {}", cause);
            app.loading = false;
            app.status_message.clear();
            app.error = Some(LOAD_FAILED_MESSAGE.to_string());
            Effect::None
        }
        Action::SessionExpired => {
            app.loading = false;
            app.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
            Effect::Logout
        }
        Action::TripSelected(id) => {
            if app.trip(id).is_some() {
                app.route = Route::Trip(id);
            } else {
                debug!("Ignoring selection of unknown trip {}", id);
            }
            Effect::None
        }
        Action::TripDeleted(id) => {
            let before = app.trips.len();
            app.trips.retain(|t| t.id != id);
            if app.trips.len() == before {
                debug!("Delete notification for trip {} not in list", id);
                return Effect::None;
            }
            if app.route == Route::Trip(id) {
                app.route = Route::Dashboard;
            }
            app.status_message = format!("Trip deleted. {} trips", app.trips.len());
            Effect::None
        }
        Action::DeleteSettled(id) => Effect::SettleDelete(id),
        Action::SetError(error) => {
            app.error = error;
            Effect::None
        }
        Action::Navigate(route) => {
            if requires_login(route) && !app.logged_in {
                app.route = Route::Login;
                return Effect::None;
            }
            app.route = route;
            if route == Route::Dashboard && app.trips.is_empty() {
                return update(app, Action::Refresh);
            }
            Effect::None
        }
        Action::SessionChanged { logged_in } => {
            if app.logged_in == logged_in {
                return Effect::None;
            }
            app.logged_in = logged_in;
            if logged_in {
                app.route = Route::Dashboard;
                return update(app, Action::Refresh);
            }
            app.trips.clear();
            app.loading = false;
            if requires_login(app.route) {
                app.route = Route::Home;
            }
            app.status_message = "Signed out".to_string();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
