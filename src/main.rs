use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vin_cache::{
    config::Config,
    database::Database,
    export::ParquetExporter,
    repositories::VehicleRepository,
    services::LookupService,
    sources::VpicClient,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "vin-cache")]
#[command(version)]
#[command(about = "A caching VIN decoding service backed by SQLite and the NHTSA vPIC API")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("vin_cache={},tower_http=trace", cli.log_level)
    } else {
        format!("vin_cache={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VIN Cache Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    info!("Using database: {}", config.database.url);

    let database = Database::new(&config.database).await?;
    database.ensure_schema().await?;
    info!("Database connection established");

    let lookup_service = LookupService::new(
        VehicleRepository::new(database.pool()),
        Arc::new(VpicClient::new(&config.decoder)),
        ParquetExporter::new(&config.storage),
    );
    info!(
        "Lookup service initialized with {} cached vehicles, decoding via {}",
        lookup_service.count().await?,
        config.decoder.base_url
    );

    let web_server = WebServer::new(config, database.clone(), lookup_service)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    let served = web_server.serve().await;

    database.close().await;
    served
}
