//! plate-relay: vehicle registration lookup relay.
//!
//! This is the application entry point. It parses CLI arguments, resolves
//! configuration, initializes tracing, builds the registry client and the Axum
//! router, and serves until a shutdown signal arrives.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plate_relay::config::{AppConfig, DEFAULT_LOG_FILTER};
use plate_relay::http::start_server;
use plate_relay::{create_router, AppState, VehicleLookupClient};

/// plate-relay: look up Israeli vehicles by license plate
#[derive(Parser, Debug)]
#[command(name = "plate-relay", version, about)]
struct Args {
    /// Path to configuration file (default: config/default.toml if present)
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Listen port, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level filter (e.g., "plate_relay=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format can be honored
    let mut config = AppConfig::resolve(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Loaded configuration");

    let vehicles = VehicleLookupClient::new(&config.upstream)?;
    tracing::info!(
        url = %config.upstream.search_url(),
        resource_id = %vehicles.resource_id(),
        timeout_secs = vehicles.timeout().as_secs(),
        "Vehicle registry configured"
    );

    let state = AppState::new(vehicles);
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
