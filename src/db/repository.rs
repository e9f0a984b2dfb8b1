// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries
// PURPOSE: Record store for ATM points of interest

use crate::errors::PoiError;
use crate::models::{NewPoi, PointOfInterest};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

/// Internal struct for mapping database rows to PointOfInterest
/// DOCUMENTATION: services is a JSON array in TEXT, fetched_at is unix millis
#[derive(Debug, FromRow)]
struct PoiRow {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub services: String,
    pub fetched_at: Option<i64>,
}

impl PoiRow {
    /// Convert PoiRow to PointOfInterest model
    fn into_poi(self) -> Result<PointOfInterest, PoiError> {
        let services: Vec<String> = serde_json::from_str(&self.services).map_err(|e| {
            log::error!("Corrupt services column for poi {}: {}", self.id, e);
            PoiError::DatabaseError(format!("corrupt services for poi {}", self.id))
        })?;

        Ok(PointOfInterest {
            id: self.id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            address: self.address,
            services,
            fetched_at: self.fetched_at.and_then(DateTime::<Utc>::from_timestamp_millis),
        })
    }
}

const SELECT_POIS: &str = r#"
    SELECT id, name, lat, lng, address, services, fetched_at
    FROM pois
"#;

/// PoiRepository: All database operations for points of interest
/// DOCUMENTATION: Holds the pool; constructed once and shared through the refresh service
#[derive(Clone)]
pub struct PoiRepository {
    pool: SqlitePool,
}

impl PoiRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the pois table if it does not exist
    /// AUTOINCREMENT keeps ids from being reused after a batch is wiped
    pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pois (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                address TEXT NOT NULL,
                services TEXT NOT NULL,
                fetched_at INTEGER
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pois_fetched_at ON pois (fetched_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Every stored record in insertion order
    pub async fn list_all(&self) -> Result<Vec<PointOfInterest>, PoiError> {
        let rows = sqlx::query_as::<_, PoiRow>(&format!("{} ORDER BY id", SELECT_POIS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list pois: {}", e);
                PoiError::DatabaseError(e.to_string())
            })?;

        rows.into_iter().map(PoiRow::into_poi).collect()
    }

    /// Get a record by id
    pub async fn get_by_id(&self, id: i64) -> Result<PointOfInterest, PoiError> {
        let row = sqlx::query_as::<_, PoiRow>(&format!("{} WHERE id = ?", SELECT_POIS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch poi {}: {}", id, e);
                PoiError::DatabaseError(e.to_string())
            })?;

        row.ok_or(PoiError::NotFound(id))?.into_poi()
    }

    /// Replace the whole table with `records` in one transaction
    /// DOCUMENTATION: Concurrent readers see either the previous batch or this one
    pub async fn replace_all(&self, records: &[NewPoi]) -> Result<(), PoiError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to begin refresh transaction: {}", e);
            PoiError::DatabaseError(e.to_string())
        })?;

        let deleted = sqlx::query("DELETE FROM pois")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to clear pois: {}", e);
                PoiError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        for record in records {
            let services = serde_json::to_string(&record.services)
                .map_err(|e| PoiError::InternalError(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO pois (name, lat, lng, address, services, fetched_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.name)
            .bind(record.lat)
            .bind(record.lng)
            .bind(&record.address)
            .bind(services)
            .bind(record.fetched_at.timestamp_millis())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to insert poi {}: {}", record.name, e);
                PoiError::DatabaseError(e.to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit refresh transaction: {}", e);
            PoiError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Replaced {} pois with a batch of {}",
            deleted,
            records.len()
        );
        Ok(())
    }

    /// True if any stored record was fetched at or after `since`
    pub async fn has_record_fetched_since(&self, since: DateTime<Utc>) -> Result<bool, PoiError> {
        let count: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pois WHERE fetched_at >= ?")
            .bind(since.timestamp_millis())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to check poi freshness: {}", e);
                PoiError::DatabaseError(e.to_string())
            })?;

        Ok(count > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{init_db_pool, Config};
    use chrono::{Duration, TimeZone};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashSet;

    /// Single-connection in-memory store; every connection to `sqlite::memory:` is its own database
    pub(crate) async fn memory_repository() -> PoiRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        PoiRepository::init_schema(&pool).await.unwrap();
        PoiRepository::new(pool)
    }

    fn new_poi(name: &str, fetched_at: DateTime<Utc>) -> NewPoi {
        NewPoi {
            name: name.to_string(),
            lat: 40.7128,
            lng: -74.006,
            address: "1 Main St".to_string(),
            services: vec!["Cash Withdrawal".to_string(), "Balance Inquiry".to_string()],
            fetched_at,
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let repo = memory_repository().await;

        assert!(repo.list_all().await.unwrap().is_empty());
        assert!(!repo.has_record_fetched_since(instant()).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_all_and_get_by_id() {
        let repo = memory_repository().await;
        repo.replace_all(&[new_poi("Chase ATM", instant()), new_poi("Urban Trust ATM", instant())])
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Chase ATM");
        assert_eq!(all[1].name, "Urban Trust ATM");
        assert_eq!(all[0].fetched_at, Some(instant()));

        let fetched = repo.get_by_id(all[1].id).await.unwrap();
        assert_eq!(fetched, all[1]);
    }

    #[tokio::test]
    async fn test_replace_all_wipes_previous_batch() {
        let repo = memory_repository().await;
        repo.replace_all(&[new_poi("Old A", instant()), new_poi("Old B", instant())])
            .await
            .unwrap();
        let old_ids: Vec<i64> = repo.list_all().await.unwrap().iter().map(|p| p.id).collect();

        repo.replace_all(&[new_poi("New", instant())]).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "New");
        // Ids are never handed out twice
        assert!(!old_ids.contains(&all[0].id));
        for id in old_ids {
            assert!(matches!(repo.get_by_id(id).await, Err(PoiError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let repo = memory_repository().await;
        let result = repo.get_by_id(999).await;
        assert!(matches!(result, Err(PoiError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_has_record_fetched_since_boundary() {
        let repo = memory_repository().await;
        repo.replace_all(&[new_poi("Edge", instant())]).await.unwrap();

        assert!(repo.has_record_fetched_since(instant()).await.unwrap());
        assert!(repo
            .has_record_fetched_since(instant() - Duration::minutes(15))
            .await
            .unwrap());
        assert!(!repo
            .has_record_fetched_since(instant() + Duration::milliseconds(1))
            .await
            .unwrap());
    }

    /// Batch `round` holds `round % 5 + 2` records stamped `round` seconds after `instant()`
    fn batch(round: i64) -> Vec<NewPoi> {
        let stamp = instant() + Duration::seconds(round);
        (0..round % 5 + 2)
            .map(|i| new_poi(&format!("Batch {} #{}", round, i), stamp))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_never_see_torn_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("pois.db").display()),
            server_address: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            db_max_connections: 4,
            db_connection_timeout: 30,
            freshness_window_minutes: 15,
        };
        let repo = PoiRepository::new(init_db_pool(&config).await.unwrap());
        repo.replace_all(&batch(0)).await.unwrap();

        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for round in 1..=100 {
                    repo.replace_all(&batch(round)).await.unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    for _ in 0..300 {
                        let all = repo.list_all().await.unwrap();
                        assert!(!all.is_empty());

                        let stamps: HashSet<_> = all.iter().map(|p| p.fetched_at).collect();
                        assert_eq!(stamps.len(), 1, "mixed batches: {:?}", stamps);

                        let stamp = all[0].fetched_at.unwrap();
                        let round = (stamp - instant()).num_seconds();
                        assert_eq!(all.len() as i64, round % 5 + 2, "partial batch {}", round);
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }

        let last = repo.list_all().await.unwrap();
        assert_eq!(last.len() as i64, 100 % 5 + 2);
    }
}
