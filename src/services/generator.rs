// src/services/generator.rs
// DOCUMENTATION: Synthetic ATM data source
// PURPOSE: Produce a batch of ATM records scattered around a search center

use crate::errors::PoiError;
use crate::models::NewPoi;
use chrono::{DateTime, Utc};
use geo_types::Point;
use rand::seq::SliceRandom;
use rand::Rng;

/// Meters per degree of latitude (flat approximation)
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Below this |cos(lat)| the longitude span is treated as degenerate (~89.994°)
pub const POLAR_COS_EPSILON: f64 = 1e-4;

pub const BANK_NAMES: [&str; 12] = [
    "United Bank",
    "Citizens Financial",
    "First National",
    "Metro Credit Union",
    "Community Bank",
    "Urban Trust",
    "Heritage Bank",
    "Liberty Financial",
    "Capital One",
    "Chase",
    "Wells Fargo",
    "Bank of America",
];

pub const STREET_NAMES: [&str; 10] = [
    "Main St",
    "Oak Ave",
    "Maple Rd",
    "Broadway",
    "Park Ave",
    "Washington St",
    "Market St",
    "State St",
    "Water St",
    "Commerce Way",
];

pub const SERVICES: [&str; 6] = [
    "Cash Withdrawal",
    "Cash Deposit",
    "Cardless Withdrawal",
    "Balance Inquiry",
    "Check Deposit",
    "Bill Payment",
];

/// Half-widths, in degrees, of the box records are scattered in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeSpan {
    pub lat: f64,
    pub lng: f64,
}

impl DegreeSpan {
    /// Convert a radius in meters around `center` to degree spans
    /// DOCUMENTATION: Treats a degree as a fixed meter count; no ellipsoidal correction
    ///
    /// # Errors
    /// `InvalidGeometry` when the center is too close to a pole for a finite longitude span
    pub fn around(center: Point<f64>, radius_meters: i64) -> Result<Self, PoiError> {
        let radius = (radius_meters as f64).abs();
        let cos_lat = center.y().to_radians().cos().abs();

        if !center.y().is_finite() || cos_lat < POLAR_COS_EPSILON {
            return Err(PoiError::InvalidGeometry(format!(
                "latitude {} is too close to a pole to build a longitude span",
                center.y()
            )));
        }

        let span = DegreeSpan {
            lat: radius / METERS_PER_DEGREE,
            lng: radius / (METERS_PER_DEGREE * cos_lat),
        };

        if !span.lat.is_finite() || !span.lng.is_finite() {
            return Err(PoiError::InvalidGeometry(format!(
                "radius {} around ({}, {}) produces a non-finite span",
                radius_meters,
                center.y(),
                center.x()
            )));
        }

        Ok(span)
    }
}

/// Mock ATM generator
/// DOCUMENTATION: Stands in for an external ATM directory
pub struct PoiGenerator;

impl PoiGenerator {
    /// Generate `count` records around `center` (x = longitude, y = latitude)
    ///
    /// Positions are uniform offsets within the degree span, so some may land
    /// outside `radius_meters`. Every record shares the same `fetched_at`.
    pub fn generate<R: Rng>(
        center: Point<f64>,
        radius_meters: i64,
        count: usize,
        fetched_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<NewPoi>, PoiError> {
        let span = DegreeSpan::around(center, radius_meters)?;

        let records: Vec<NewPoi> = (0..count)
            .map(|_| Self::generate_one(center, span, fetched_at, rng))
            .collect();

        log::debug!(
            "Generated {} pois around ({:.4}, {:.4}), span lat={:.5}° lng={:.5}°",
            records.len(),
            center.y(),
            center.x(),
            span.lat,
            span.lng
        );

        Ok(records)
    }

    fn generate_one<R: Rng>(
        center: Point<f64>,
        span: DegreeSpan,
        fetched_at: DateTime<Utc>,
        rng: &mut R,
    ) -> NewPoi {
        let lat = center.y() + (rng.gen::<f64>() * 2.0 - 1.0) * span.lat;
        let lng = center.x() + (rng.gen::<f64>() * 2.0 - 1.0) * span.lng;

        let bank = BANK_NAMES.choose(rng).copied().unwrap_or(BANK_NAMES[0]);
        let street = STREET_NAMES.choose(rng).copied().unwrap_or(STREET_NAMES[0]);
        let street_number: u32 = rng.gen_range(1..=999);

        let service_count = rng.gen_range(2..=4);
        let services = SERVICES
            .choose_multiple(rng, service_count)
            .map(|s| s.to_string())
            .collect();

        NewPoi {
            name: format!("{} ATM", bank),
            lat,
            lng,
            address: format!("{} {}", street_number, street),
            services,
            fetched_at,
        }
    }
}
