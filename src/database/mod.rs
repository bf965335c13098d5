use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::info;

use crate::errors::RepositoryResult;

const CREATE_VEHICLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY,
        vin TEXT NOT NULL UNIQUE,
        make TEXT NOT NULL DEFAULT '',
        model TEXT NOT NULL DEFAULT '',
        year TEXT NOT NULL DEFAULT '',
        class TEXT NOT NULL DEFAULT ''
    )
"#;

/// Owned handle to the SQLite cache
///
/// Opened once at startup and shared by cloning; the pool is reference
/// counted so every clone talks to the same connections.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn pool(&self) -> Pool<Sqlite> {
        self.pool.clone()
    }

    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(&config.url).await? {
            Sqlite::create_database(&config.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(5))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Create the vehicles table if it is absent. Safe to call repeatedly.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_VEHICLES_TABLE)
            .execute(&self.pool)
            .await?;
        info!("Vehicle cache schema ready");
        Ok(())
    }

    /// Cheap connectivity probe used by the health endpoint
    pub async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; outstanding queries are allowed to finish
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}
