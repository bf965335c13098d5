//! Cache-backed VIN lookup
//!
//! A lookup checks the store, decodes through the upstream on a miss, and
//! writes the decoded vehicle back. Removal and export operate on the store
//! directly.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::{AppResult, RepositoryError};
use crate::export::ParquetExporter;
use crate::models::{RemoveOutcome, VehicleLookup, VehicleRecord};
use crate::repositories::VehicleRepository;
use crate::sources::VinDecoder;
use crate::utils::validate_vin;

/// Orchestrates the vehicle cache, the decoder, and the exporter
#[derive(Clone)]
pub struct LookupService {
    repository: VehicleRepository,
    decoder: Arc<dyn VinDecoder>,
    exporter: ParquetExporter,
}

impl LookupService {
    pub fn new(
        repository: VehicleRepository,
        decoder: Arc<dyn VinDecoder>,
        exporter: ParquetExporter,
    ) -> Self {
        Self {
            repository,
            decoder,
            exporter,
        }
    }

    /// Return the vehicle for `vin`, decoding and caching it on a miss
    pub async fn lookup(&self, vin: &str) -> AppResult<VehicleLookup> {
        validate_vin(vin)?;

        if let Some(record) = self.repository.find_by_vin(vin).await? {
            debug!("Cache hit for VIN {}", vin);
            return Ok(VehicleLookup::cached(record));
        }

        debug!("Cache miss for VIN {}, calling decoder", vin);
        let decoded = self.decoder.decode(vin).await?;

        match self.repository.insert(&decoded).await {
            Ok(_) => {
                info!("Cached newly decoded VIN {}", vin);
                Ok(VehicleLookup::fresh(decoded))
            }
            Err(RepositoryError::DuplicateKey { .. }) => {
                // Another request cached this VIN between our check and insert
                warn!("VIN {} was cached concurrently, re-reading the stored row", vin);
                match self.repository.find_by_vin(vin).await? {
                    Some(record) => Ok(VehicleLookup::cached(record)),
                    None => Ok(VehicleLookup::fresh(decoded)),
                }
            }
            Err(e) => {
                error!("Failed to cache VIN {}: {}", vin, e);
                Err(e.into())
            }
        }
    }

    /// Remove `vin` from the cache
    pub async fn remove(&self, vin: &str) -> AppResult<RemoveOutcome> {
        validate_vin(vin)?;

        let removed = self.repository.remove(vin).await?;
        if removed > 0 {
            info!("Removed VIN {} from cache", vin);
            Ok(RemoveOutcome::Removed)
        } else {
            debug!("VIN {} not present, nothing removed", vin);
            Ok(RemoveOutcome::NotFound)
        }
    }

    /// Write the whole cache to the export file and return its path
    pub async fn export(&self) -> AppResult<PathBuf> {
        let records = self.repository.scan_all().await?;
        let path = self.exporter.write(records).await?;
        Ok(path)
    }

    /// Every cached vehicle in insertion order
    pub async fn list(&self) -> AppResult<Vec<VehicleRecord>> {
        Ok(self.repository.scan_all().await?)
    }

    /// Number of cached vehicles
    pub async fn count(&self) -> AppResult<i64> {
        Ok(self.repository.count().await?)
    }
}
