//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ratatui::buffer::Buffer;

use crate::api::{ApiError, TripsApi};
use crate::core::route::Navigator;
use crate::core::trip::{DayPlan, Location, PlaceOfInterest, Trip, TripId, TripPlan};
use crate::tui::components::TripCardCallbacks;

fn location(name: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        name: name.to_string(),
        latitude,
        longitude,
    }
}

/// Lisbon to Porto over three days, with a two-day itinerary.
pub fn sample_trip(id: TripId) -> Trip {
    let lisbon = location("Lisbon", 38.7223, -9.1393);
    let coimbra = location("Coimbra", 40.2033, -8.4103);
    let porto = location("Porto", 41.1579, -8.6291);
    Trip {
        id,
        from: "Lisbon".to_string(),
        to: "Porto".to_string(),
        roundtrip: false,
        days: 3,
        interests: vec!["food".to_string(), "history".to_string()],
        distance_km: 312.5,
        created_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        trip_plans: vec![TripPlan {
            id: id * 10,
            days: vec![
                DayPlan {
                    id: id * 100 + 1,
                    day_number: 1,
                    start_location: lisbon,
                    finish_location: coimbra.clone(),
                    distance_km: 205.0,
                    introduction: "Leave the coast behind for the university town.".to_string(),
                    places_of_interest: vec![PlaceOfInterest {
                        name: "Belem Tower".to_string(),
                        description: "Sixteenth century fortification".to_string(),
                        latitude: 38.6916,
                        longitude: -9.2160,
                    }],
                },
                DayPlan {
                    id: id * 100 + 2,
                    day_number: 2,
                    start_location: coimbra,
                    finish_location: porto,
                    distance_km: 107.5,
                    introduction: "North along the river valleys.".to_string(),
                    places_of_interest: vec![PlaceOfInterest {
                        name: "Livraria Lello".to_string(),
                        description: String::new(),
                        latitude: 41.1469,
                        longitude: -8.6148,
                    }],
                },
            ],
        }],
    }
}

/// Wire form of [`sample_trip`], as the trip service sends it.
pub fn trip_json(id: TripId) -> String {
    format!(
        r#"{{
            "id": {id},
            "from": "Lisbon",
            "to": "Porto",
            "roundtrip": false,
            "days": 3,
            "interests": ["food", "history"],
            "distanceKm": 312.5,
            "createdAt": "2024-03-15T12:00:00Z",
            "tripPlans": [{{
                "id": {plan_id},
                "days": [
                    {{
                        "id": {day1_id},
                        "dayNumber": 1,
                        "startLocation": {{"name": "Lisbon", "latitude": 38.7223, "longitude": -9.1393}},
                        "finishLocation": {{"name": "Coimbra", "latitude": 40.2033, "longitude": -8.4103}},
                        "distanceKm": 205.0,
                        "introduction": "Leave the coast behind for the university town.",
                        "placesOfInterest": [{{
                            "name": "Belem Tower",
                            "description": "Sixteenth century fortification",
                            "latitude": 38.6916,
                            "longitude": -9.2160
                        }}]
                    }},
                    {{
                        "id": {day2_id},
                        "dayNumber": 2,
                        "startLocation": {{"name": "Coimbra", "latitude": 40.2033, "longitude": -8.4103}},
                        "finishLocation": {{"name": "Porto", "latitude": 41.1579, "longitude": -8.6291}},
                        "distanceKm": 107.5,
                        "introduction": "North along the river valleys.",
                        "placesOfInterest": [{{
                            "name": "Livraria Lello",
                            "description": "",
                            "latitude": 41.1469,
                            "longitude": -8.6148
                        }}]
                    }}
                ]
            }}]
        }}"#,
        plan_id = id * 10,
        day1_id = id * 100 + 1,
        day2_id = id * 100 + 2,
    )
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "roadtrip-test-{}-{}-{}",
        name,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Flatten a rendered buffer into newline-separated rows.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

/// Navigator that records every path it is asked to visit.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// Card callbacks that record each invocation.
#[derive(Default)]
pub struct RecordingCallbacks {
    selected: Mutex<Vec<TripId>>,
    deleted: Mutex<Vec<TripId>>,
    errors: Mutex<Vec<Option<String>>>,
}

impl RecordingCallbacks {
    pub fn selected(&self) -> Vec<TripId> {
        self.selected.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<TripId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Option<String>> {
        self.errors.lock().unwrap().clone()
    }
}

impl TripCardCallbacks for RecordingCallbacks {
    fn on_select(&self, id: TripId) {
        self.selected.lock().unwrap().push(id);
    }

    fn on_delete(&self, id: TripId) {
        self.deleted.lock().unwrap().push(id);
    }

    fn set_error(&self, error: Option<String>) {
        self.errors.lock().unwrap().push(error);
    }
}

enum FakeBehavior {
    Succeed,
    Fail(u16),
    Hang(Duration),
}

/// Scripted trip service. `list_trips` always returns an empty list.
pub struct FakeTripsApi {
    behavior: FakeBehavior,
    delete_calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl FakeTripsApi {
    fn with_behavior(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            delete_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    /// Every delete succeeds.
    pub fn succeeding() -> Self {
        Self::with_behavior(FakeBehavior::Succeed)
    }

    /// Every delete is answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self::with_behavior(FakeBehavior::Fail(status))
    }

    /// Every delete sleeps for `delay` before succeeding.
    pub fn hanging(delay: Duration) -> Self {
        Self::with_behavior(FakeBehavior::Hang(delay))
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TripsApi for FakeTripsApi {
    async fn list_trips(&self, _token: &str) -> Result<Vec<Trip>, ApiError> {
        Ok(Vec::new())
    }

    async fn delete_trip(&self, _id: TripId, token: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_string());
        match &self.behavior {
            FakeBehavior::Succeed => Ok(()),
            FakeBehavior::Fail(status) => Err(ApiError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            FakeBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
        }
    }
}
