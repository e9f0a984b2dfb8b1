// src/services/refresh_service.rs
// DOCUMENTATION: Freshness-gated ATM cache
// PURPOSE: Decide between serving the stored batch and regenerating it

use crate::db::PoiRepository;
use crate::errors::PoiError;
use crate::models::PointOfInterest;
use crate::services::PoiGenerator;
use chrono::{DateTime, Duration, Utc};
use geo_types::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Default freshness window for a refresh batch
pub const DEFAULT_FRESHNESS_MINUTES: i64 = 15;

/// Number of records generated per refresh
pub const BATCH_SIZE: RangeInclusive<usize> = 5..=15;

/// Refresh service over the record store
/// DOCUMENTATION: Built once in main.rs and shared with handlers through web::Data
///
/// The whole table is one cache entry: while any record is younger than the
/// freshness window the stored batch is returned as-is, otherwise the table
/// is wiped and refilled around the caller's position.
pub struct RefreshService {
    repository: PoiRepository,
    freshness_window: Duration,
}

impl RefreshService {
    pub fn new(repository: PoiRepository, freshness_window: Duration) -> Self {
        Self {
            repository,
            freshness_window,
        }
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// List ATMs near a point
    /// Cache hits ignore `lat`, `lng` and `radius_meters` entirely
    pub async fn list_near(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: i64,
    ) -> Result<Vec<PointOfInterest>, PoiError> {
        let mut rng = StdRng::from_entropy();
        self.list_near_at(lat, lng, radius_meters, Utc::now(), &mut rng)
            .await
    }

    /// `list_near` with an explicit clock and random source
    pub async fn list_near_at<R: Rng>(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: i64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<PointOfInterest>, PoiError> {
        let threshold = now - self.freshness_window;

        if self.repository.has_record_fetched_since(threshold).await? {
            log::info!("Using cached ATM data");
            return self.repository.list_all().await;
        }

        let count = rng.gen_range(BATCH_SIZE);
        log::info!(
            "No fresh ATM data available, generating {} mock ATMs around ({}, {})",
            count,
            lat,
            lng
        );

        let batch = PoiGenerator::generate(Point::new(lng, lat), radius_meters, count, now, rng)?;
        self.repository.replace_all(&batch).await?;

        self.repository.list_all().await
    }

    /// Detail record for one ATM
    pub async fn get_detail(&self, id: i64) -> Result<PointOfInterest, PoiError> {
        self.repository.get_by_id(id).await
    }
}
