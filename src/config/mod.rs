use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub decoder: DecoderConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Scheme and host of the vPIC API, e.g. `https://vpic.nhtsa.dot.gov`
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub export_dir: PathBuf,
    pub export_file_name: String,
}

impl StorageConfig {
    /// Full path of the parquet export file
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./fvd.db".to_string(),
                max_connections: Some(5),
            },
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            decoder: DecoderConfig {
                base_url: "https://vpic.nhtsa.dot.gov".to_string(),
                user_agent: format!("VIN-Cache/{}", env!("CARGO_PKG_VERSION")),
            },
            storage: StorageConfig {
                export_dir: PathBuf::from("./data_files"),
                export_file_name: "db_cache.parquet".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
