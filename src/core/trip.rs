//! # Trip Data Model
//!
//! Wire types for trips returned by the trip service, plus the small set of
//! formatting helpers the trip list renders from.
//!
//! ```text
//! Trip
//! ├── id, from, to, roundtrip, days, interests, distance_km, created_at
//! └── trip_plans: Vec<TripPlan>      // alternative itineraries (revisions)
//!     └── days: Vec<DayPlan>         // ordered by day_number
//!         ├── start_location / finish_location: Location
//!         └── places_of_interest: Vec<PlaceOfInterest>
//! ```
//!
//! All types deserialize from the service's camelCase JSON.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned trip identifier.
pub type TripId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceOfInterest {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub id: i64,
    pub day_number: u32,
    pub start_location: Location,
    pub finish_location: Location,
    pub distance_km: f64,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub places_of_interest: Vec<PlaceOfInterest>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub id: i64,
    #[serde(default)]
    pub days: Vec<DayPlan>,
}

impl TripPlan {
    /// Days in display order (ascending `day_number`).
    pub fn ordered_days(&self) -> Vec<&DayPlan> {
        let mut days: Vec<&DayPlan> = self.days.iter().collect();
        days.sort_by_key(|d| d.day_number);
        days
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub roundtrip: bool,
    pub days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    pub distance_km: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub trip_plans: Vec<TripPlan>,
}

/// Ways a trip can violate the data model's invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum TripError {
    NegativeDistance(f64),
    DayOutOfRange { plan_id: i64, day_number: u32, days: u32 },
    DuplicateDay { plan_id: i64, day_number: u32 },
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::NegativeDistance(d) => write!(f, "negative distance: {d} km"),
            TripError::DayOutOfRange {
                plan_id,
                day_number,
                days,
            } => write!(f, "plan {plan_id}: day {day_number} outside 1..={days}"),
            TripError::DuplicateDay {
                plan_id,
                day_number,
            } => write!(f, "plan {plan_id}: day {day_number} appears twice"),
        }
    }
}

impl std::error::Error for TripError {}

impl Trip {
    /// Check the invariants a displayable trip must satisfy.
    pub fn validate(&self) -> Result<(), TripError> {
        if self.distance_km < 0.0 || self.distance_km.is_nan() {
            return Err(TripError::NegativeDistance(self.distance_km));
        }
        for plan in &self.trip_plans {
            let mut seen = HashSet::new();
            for day in &plan.days {
                if day.day_number < 1 || day.day_number > self.days {
                    return Err(TripError::DayOutOfRange {
                        plan_id: plan.id,
                        day_number: day.day_number,
                        days: self.days,
                    });
                }
                if !seen.insert(day.day_number) {
                    return Err(TripError::DuplicateDay {
                        plan_id: plan.id,
                        day_number: day.day_number,
                    });
                }
            }
        }
        Ok(())
    }

    /// "Lisbon to Porto"
    pub fn route_label(&self) -> String {
        format!("{} to {}", self.from, self.to)
    }

    /// Creation date in the user's local timezone, `M/D/YYYY`.
    pub fn created_label(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%-m/%-d/%Y")
            .to_string()
    }

    /// Distance with its unit. The number is printed as-is (`120 km`, `87.5 km`).
    pub fn distance_label(&self) -> String {
        format!("{} km", self.distance_km)
    }

    /// Comma-joined interests, or `None` when there are none.
    pub fn interests_label(&self) -> String {
        if self.interests.is_empty() {
            "None".to_string()
        } else {
            self.interests.join(", ")
        }
    }

    /// The plan shown in the detail view: the first one the server sent.
    pub fn primary_plan(&self) -> Option<&TripPlan> {
        self.trip_plans.first()
    }
}

/// Accepts RFC 3339 timestamps and offset-less ones (treated as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_trip, trip_json};

    #[test]
    fn test_deserialize_camel_case_trip() {
        let trip: Trip = serde_json::from_str(&trip_json(7)).unwrap();
        assert_eq!(trip.id, 7);
        assert_eq!(trip.from, "Lisbon");
        assert_eq!(trip.distance_km, 312.5);
        assert_eq!(trip.trip_plans.len(), 1);
        let day = &trip.trip_plans[0].days[0];
        assert_eq!(day.start_location.name, "Lisbon");
        assert_eq!(day.places_of_interest[0].name, "Belem Tower");
    }

    #[test]
    fn test_deserialize_defaults_missing_collections() {
        let json = r#"{
            "id": 1, "from": "A", "to": "B", "days": 2,
            "distanceKm": 10, "createdAt": "2024-03-01T08:30:00"
        }"#;
        let trip: Trip = serde_json::from_str(json).unwrap();
        assert!(trip.interests.is_empty());
        assert!(trip.trip_plans.is_empty());
        assert!(!trip.roundtrip);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let with_offset = parse_timestamp("2024-03-01T08:30:00+02:00").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2024-03-01T06:30:00+00:00");

        let naive = parse_timestamp("2024-03-01T08:30:00.123").unwrap();
        assert_eq!(naive.format("%H:%M").to_string(), "08:30");

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_interests_label_empty_is_none() {
        let mut trip = sample_trip(1);
        trip.interests.clear();
        assert_eq!(trip.interests_label(), "None");
    }

    #[test]
    fn test_interests_label_joins() {
        let mut trip = sample_trip(1);
        trip.interests = vec!["food".into(), "hiking".into(), "museums".into()];
        assert_eq!(trip.interests_label(), "food, hiking, museums");
    }

    #[test]
    fn test_distance_label_unmodified() {
        let mut trip = sample_trip(1);
        trip.distance_km = 120.0;
        assert_eq!(trip.distance_label(), "120 km");
        trip.distance_km = 87.25;
        assert_eq!(trip.distance_label(), "87.25 km");
    }

    #[test]
    fn test_route_label() {
        assert_eq!(sample_trip(1).route_label(), "Lisbon to Porto");
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert_eq!(sample_trip(1).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        let mut trip = sample_trip(1);
        trip.distance_km = -1.0;
        assert_eq!(trip.validate(), Err(TripError::NegativeDistance(-1.0)));
    }

    #[test]
    fn test_validate_rejects_day_out_of_range() {
        let mut trip = sample_trip(1);
        trip.trip_plans[0].days[0].day_number = trip.days + 1;
        assert!(matches!(
            trip.validate(),
            Err(TripError::DayOutOfRange { .. })
        ));

        trip.trip_plans[0].days[0].day_number = 0;
        assert!(matches!(
            trip.validate(),
            Err(TripError::DayOutOfRange { day_number: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_day() {
        let mut trip = sample_trip(1);
        let dup = trip.trip_plans[0].days[0].clone();
        trip.trip_plans[0].days.push(dup);
        assert!(matches!(
            trip.validate(),
            Err(TripError::DuplicateDay { day_number: 1, .. })
        ));
    }

    #[test]
    fn test_ordered_days_sorts_by_day_number() {
        let mut trip = sample_trip(1);
        trip.trip_plans[0].days.reverse();
        let plan = trip.primary_plan().unwrap();
        let numbers: Vec<u32> = plan.ordered_days().iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
