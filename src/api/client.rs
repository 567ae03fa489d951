use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;

use crate::core::trip::{Trip, TripId};

/// Errors that can occur talking to the trip service.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The request did not finish within its time budget.
    Timeout(Duration),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
}

impl ApiError {
    /// True when the service rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Api { status: 401, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Timeout(after) => write!(f, "timed out after {}s", after.as_secs_f32()),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(Duration::ZERO)
        } else if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[async_trait]
pub trait TripsApi: Send + Sync {
    /// Fetch the signed-in user's trips.
    async fn list_trips(&self, token: &str) -> Result<Vec<Trip>, ApiError>;

    /// Delete one trip. Any 2xx answer counts as success.
    async fn delete_trip(&self, id: TripId, token: &str) -> Result<(), ApiError>;
}

/// `reqwest`-backed client for `{base_url}/api/trips`.
pub struct HttpTripsApi {
    base_url: String,
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTripsApi {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn trips_url(&self) -> String {
        format!("{}/api/trips", self.base_url)
    }

    fn trip_url(&self, id: TripId) -> String {
        format!("{}/api/trips/{}", self.base_url, id)
    }

    /// Like `From<reqwest::Error>`, but reports the configured budget on timeout.
    fn request_error(&self, e: reqwest::Error) -> ApiError {
        match ApiError::from(e) {
            ApiError::Timeout(_) => ApiError::Timeout(self.request_timeout),
            other => other,
        }
    }
}

/// Turn a non-2xx response into `ApiError::Api`, keeping the body for the log.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    warn!("Trip service error: {} - {}", status.as_u16(), message);
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TripsApi for HttpTripsApi {
    async fn list_trips(&self, token: &str) -> Result<Vec<Trip>, ApiError> {
        let url = self.trips_url();
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let response = check_status(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        // Decode entry by entry so one malformed trip does not hide the rest
        let entries: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let received = entries.len();
        let trips: Vec<Trip> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Trip>(entry) {
                Ok(trip) => Some(trip),
                Err(e) => {
                    warn!("Skipping undecodable trip: {}", e);
                    None
                }
            })
            .collect();
        info!("Fetched {} of {} trips", trips.len(), received);
        Ok(trips)
    }

    async fn delete_trip(&self, id: TripId, token: &str) -> Result<(), ApiError> {
        let url = self.trip_url(id);
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        check_status(response).await?;
        info!("Deleted trip {}", id);
        Ok(())
    }
}
