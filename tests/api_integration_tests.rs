use std::time::Duration;

use roadtrip::api::{ApiError, HttpTripsApi, TripsApi};
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn api_for(server: &MockServer) -> HttpTripsApi {
    HttpTripsApi::new(server.uri(), Duration::from_secs(5))
}

/// Minimal trip body with a single one-day plan.
fn trip_body(id: i64, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "from": "Madrid",
        "to": "Seville",
        "roundtrip": true,
        "days": 2,
        "interests": ["architecture"],
        "distanceKm": 530.0,
        "createdAt": created_at,
        "tripPlans": [{
            "id": id * 10,
            "days": [{
                "id": id * 100,
                "dayNumber": 1,
                "startLocation": {"name": "Madrid", "latitude": 40.4168, "longitude": -3.7038},
                "finishLocation": {"name": "Cordoba", "latitude": 37.8882, "longitude": -4.7794},
                "distanceKm": 400.0,
                "introduction": "South across La Mancha.",
                "placesOfInterest": []
            }]
        }]
    })
}

// ============================================================================
// DELETE /api/trips/{id}
// ============================================================================

#[tokio::test]
async fn test_delete_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/trips/42"))
        .and(header("Authorization", "Bearer secret-jwt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    assert_ok!(api.delete_trip(42, "secret-jwt").await);
}

#[tokio::test]
async fn test_delete_accepts_any_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/trips/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .mount(&mock_server)
        .await;

    assert_ok!(api_for(&mock_server).delete_trip(1, "jwt").await);
}

#[tokio::test]
async fn test_delete_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/trips/5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(api_for(&mock_server).delete_trip(5, "jwt").await);
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_empty_error_body_uses_reason_phrase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = assert_err!(api_for(&mock_server).delete_trip(9, "jwt").await);
    assert_eq!(err.to_string(), "API error (HTTP 404): Not Found");
}

#[tokio::test]
async fn test_delete_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let api = HttpTripsApi::new(mock_server.uri(), Duration::from_millis(100));
    let err = assert_err!(api.delete_trip(3, "jwt").await);
    assert!(
        matches!(err, ApiError::Timeout(after) if after == Duration::from_millis(100)),
        "Expected timeout, got {:?}",
        err
    );
}

#[tokio::test]
async fn test_delete_unreachable_server_is_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let api = HttpTripsApi::new("http://127.0.0.1:9", Duration::from_secs(2));
    let err = assert_err!(api.delete_trip(1, "jwt").await);
    assert!(
        matches!(err, ApiError::Network(_) | ApiError::Timeout(_)),
        "got {:?}",
        err
    );
}

// ============================================================================
// GET /api/trips
// ============================================================================

#[tokio::test]
async fn test_list_trips_parses_camel_case() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!([
        trip_body(1, "2024-05-01T09:00:00Z"),
        trip_body(2, "2024-05-02T10:15:30.250")
    ]);
    Mock::given(method("GET"))
        .and(path("/api/trips"))
        .and(header("Authorization", "Bearer jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let trips = assert_ok!(api_for(&mock_server).list_trips("jwt").await);
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].route_label(), "Madrid to Seville");
    assert!(trips[0].roundtrip);
    assert_eq!(trips[1].trip_plans[0].days[0].start_location.name, "Madrid");
    assert_eq!(trips[1].created_at.to_rfc3339(), "2024-05-02T10:15:30.250+00:00");
}

#[tokio::test]
async fn test_list_trips_skips_undecodable_entries() {
    let mock_server = MockServer::start().await;

    let mut bad_day = trip_body(3, "2024-05-03T08:00:00Z");
    bad_day["tripPlans"][0]["days"][0]["dayNumber"] = serde_json::json!(-1);
    let body = serde_json::json!([
        trip_body(1, "2024-05-01T09:00:00Z"),
        trip_body(2, "2024-01-01"),
        bad_day
    ]);
    Mock::given(method("GET"))
        .and(path("/api/trips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let trips = assert_ok!(api_for(&mock_server).list_trips("jwt").await);
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id, 1);
}

#[tokio::test]
async fn test_list_trips_no_content_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trips"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let trips = assert_ok!(api_for(&mock_server).list_trips("jwt").await);
    assert!(trips.is_empty());
}

#[tokio::test]
async fn test_list_trips_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trips"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(api_for(&mock_server).list_trips("stale").await);
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_list_trips_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trips"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(api_for(&mock_server).list_trips("jwt").await);
    assert!(matches!(err, ApiError::Parse(_)), "got {:?}", err);
}
