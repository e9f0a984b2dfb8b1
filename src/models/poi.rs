// src/models/poi.rs
// DOCUMENTATION: Core data structures for ATM points of interest
// PURPOSE: Defines the stored record, generation input, and API payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default search radius in meters
pub const DEFAULT_RADIUS: i64 = 1000;

/// A stored ATM record
/// DOCUMENTATION: Maps to one row of the pois table; `id` is assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    /// Service tags, unique within a record
    pub services: Vec<String>,
    /// When this record's batch was populated (ISO-8601 on the wire)
    pub fetched_at: Option<DateTime<Utc>>,
}

/// A generated record that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoi {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub services: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Raw query string for GET /api/pois
/// DOCUMENTATION: Fields stay strings so malformed numbers default instead of rejecting the request
#[derive(Debug, Default)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

impl NearbyQuery {
    /// Build from decoded query pairs; the first occurrence of a key wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = NearbyQuery::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "lat" => &mut query.lat,
                "lng" => &mut query.lng,
                "radius" => &mut query.radius,
                _ => continue,
            };
            slot.get_or_insert(value);
        }

        query
    }

    pub fn lat(&self) -> f64 {
        parse_finite(self.lat.as_deref()).unwrap_or(0.0)
    }

    pub fn lng(&self) -> f64 {
        parse_finite(self.lng.as_deref()).unwrap_or(0.0)
    }

    /// Radius in meters; accepts "1500" and "1500.0"
    pub fn radius(&self) -> i64 {
        let Some(raw) = self.radius.as_deref().map(str::trim) else {
            return DEFAULT_RADIUS;
        };

        raw.parse::<i64>()
            .ok()
            .or_else(|| parse_finite(Some(raw)).map(|r| r as i64))
            .unwrap_or(DEFAULT_RADIUS)
    }
}

fn parse_finite(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Response body for GET /api/pois
#[derive(Debug, Serialize, Deserialize)]
pub struct PoiListResponse {
    pub pois: Vec<PointOfInterest>,
}
