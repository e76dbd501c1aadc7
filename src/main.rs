//! Speedtest Collector Binary

use clap::Parser;
use speedtest_collector::{
    Config, InfluxClient, SpeedtestCollector, SpeedtestRunner, provision,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    initialize_tracing();

    info!("Starting speedtest collector v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Collector configuration - Host: {}, Port: {}, Database: {}, User: {}",
        config.influx_host, config.influx_port, config.influx_db, config.influx_user
    );

    let client = match InfluxClient::new(
        config.influx_url(),
        config.influx_user.clone(),
        config.influx_pass.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build InfluxDB client: {}", e);
            std::process::exit(1);
        }
    };

    // Provisioning failures are setup defects and must fail the run visibly.
    if let Err(e) = provision::ensure_database(&client, &config.influx_db).await {
        error!("Failed to provision database '{}': {}", config.influx_db, e);
        std::process::exit(1);
    }

    // A failed measurement or write must not fail the scheduled job; the
    // next scheduled run retries naturally.
    let collector = SpeedtestCollector::new(SpeedtestRunner::new(), client, config.influx_db);

    match collector.collect_and_write().await {
        Ok(_) => info!("Speed test recorded"),
        Err(e) => error!("Error while running speedtest: {}", e),
    }
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
