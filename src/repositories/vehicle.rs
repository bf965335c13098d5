//! Vehicle repository implementation
//!
//! Persistence for decoded vehicles keyed by VIN. The table's unique
//! constraint on `vin` is the only thing that arbitrates concurrent inserts.

use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{DecodedVehicle, VehicleRecord};

/// Repository implementation for cached vehicles
#[derive(Clone)]
pub struct VehicleRepository {
    pool: Pool<Sqlite>,
}

impl VehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Exact-match lookup by VIN
    pub async fn find_by_vin(&self, vin: &str) -> RepositoryResult<Option<VehicleRecord>> {
        let record = sqlx::query_as::<_, VehicleRecord>(
            "SELECT id, vin, make, model, year, class FROM vehicles WHERE vin = ?",
        )
        .bind(vin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a decoded vehicle, failing with `DuplicateKey` if the VIN exists
    pub async fn insert(&self, vehicle: &DecodedVehicle) -> RepositoryResult<VehicleRecord> {
        let result = sqlx::query(
            "INSERT INTO vehicles (vin, make, model, year, class) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&vehicle.vin)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.year)
        .bind(&vehicle.body_class)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                debug!("Cached vehicle {} as row {}", vehicle.vin, done.last_insert_rowid());
                Ok(VehicleRecord {
                    id: done.last_insert_rowid(),
                    vin: vehicle.vin.clone(),
                    make: vehicle.make.clone(),
                    model: vehicle.model.clone(),
                    year: vehicle.year.clone(),
                    body_class: vehicle.body_class.clone(),
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepositoryError::duplicate_key(&vehicle.vin))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete by VIN, returning the number of rows removed (0 or 1)
    pub async fn remove(&self, vin: &str) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vin = ?")
            .bind(vin)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Every cached vehicle in primary-key order
    pub async fn scan_all(&self) -> RepositoryResult<Vec<VehicleRecord>> {
        let records = sqlx::query_as::<_, VehicleRecord>(
            "SELECT id, vin, make, model, year, class FROM vehicles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
