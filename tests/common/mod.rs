#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;

use vin_cache::{
    config::Config,
    database::Database,
    errors::{SourceError, SourceResult},
    export::ParquetExporter,
    models::DecodedVehicle,
    repositories::VehicleRepository,
    services::LookupService,
    sources::VinDecoder,
    web::{AppState, WebServer},
};

pub const ACCORD_VIN: &str = "1HGCM82633A004352";
pub const TESLA_VIN: &str = "5YJSA1E26HF000337";
pub const BAD_CHECK_DIGIT_VIN: &str = "1HGCM82633A004353";
pub const UPSTREAM_DOWN_VIN: &str = "JH4DA9370MS016526";

pub const CHECK_DIGIT_ERROR: &str = "1 - Check Digit (9th position) does not calculate properly";

pub fn accord() -> DecodedVehicle {
    DecodedVehicle {
        vin: ACCORD_VIN.to_string(),
        make: "HONDA".to_string(),
        model: "Accord".to_string(),
        year: "2003".to_string(),
        body_class: "Coupe".to_string(),
    }
}

pub fn tesla() -> DecodedVehicle {
    DecodedVehicle {
        vin: TESLA_VIN.to_string(),
        make: "TESLA".to_string(),
        model: "Model S".to_string(),
        year: "2017".to_string(),
        body_class: "Hatchback/Liftback/Notchback".to_string(),
    }
}

/// In-memory decoder that counts how often it is called
#[derive(Clone, Default)]
pub struct FakeDecoder {
    calls: Arc<AtomicUsize>,
    vehicles: Arc<HashMap<String, DecodedVehicle>>,
}

impl FakeDecoder {
    pub fn with_vehicles(vehicles: Vec<DecodedVehicle>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            vehicles: Arc::new(vehicles.into_iter().map(|v| (v.vin.clone(), v)).collect()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VinDecoder for FakeDecoder {
    async fn decode(&self, vin: &str) -> SourceResult<DecodedVehicle> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if vin == UPSTREAM_DOWN_VIN {
            return Err(SourceError::parse_error("decoder response contained no Results"));
        }

        self.vehicles
            .get(vin)
            .cloned()
            .ok_or_else(|| SourceError::invalid_vin(CHECK_DIGIT_ERROR))
    }
}

pub struct TestApp {
    pub router: Router,
    pub decoder: FakeDecoder,
    pub database: Database,
    pub repository: VehicleRepository,
    pub service: LookupService,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub fn export_path(&self) -> PathBuf {
        self.config.storage.export_path()
    }
}

/// Fresh database in a temp dir
pub async fn test_database(dir: &TempDir) -> (Config, Database) {
    let mut config = Config::default();
    config.database.url = format!("sqlite://{}", dir.path().join("vin-cache.db").display());
    config.storage.export_dir = dir.path().join("data_files");

    let database = Database::new(&config.database).await.unwrap();
    database.ensure_schema().await.unwrap();
    (config, database)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(FakeDecoder::with_vehicles(vec![accord(), tesla()])).await
}

pub async fn spawn_app_with(decoder: FakeDecoder) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let (config, database) = test_database(&dir).await;

    let repository = VehicleRepository::new(database.pool());
    let service = LookupService::new(
        repository.clone(),
        Arc::new(decoder.clone()),
        ParquetExporter::new(&config.storage),
    );

    let router = WebServer::create_router(AppState {
        database: database.clone(),
        config: config.clone(),
        lookup_service: service.clone(),
    });

    TestApp {
        router,
        decoder,
        database,
        repository,
        service,
        config,
        _dir: dir,
    }
}
