mod bridge;
mod config;
mod derived;
mod error;
mod hub;
mod models;
mod pipeline;
mod units;
mod utils;
mod wind;

use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::time::{sleep, Duration};

use bridge::{BridgeClient, TemplateCatalog};
use config::BridgeConfig;
use error::BridgeError;
use hub::{node_definitions, NodeSink};
use pipeline::PollCycle;
use utils::{duration_to_seconds, format_datetime};

async fn main_loop(config: BridgeConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Meteobridge poll service");

    let catalog = TemplateCatalog::new(config.catalog_version);
    let mut cycle = PollCycle::new(catalog, config.units);
    let mut sink = NodeSink::new();

    info!("Creating nodes");
    for (node, driver, uom) in node_definitions(config.units, catalog.has_lightning()) {
        debug!("  {}.{} (uom {})", node, driver, uom);
    }

    // Without address and password every cycle is skipped as not configured
    let client = match BridgeClient::new(&config, cycle.catalog()) {
        Ok(client) => {
            info!("Connecting to Meteobridge at: {}", client.url().host_str().unwrap_or_default());
            Some(client)
        }
        Err(e) if e.is_configuration() => {
            warn!("{}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let poll_secs = config.poll_interval.as_secs();

    loop {
        let start_time = OffsetDateTime::now_utc();
        debug!("Poll cycle started at: {}", format_datetime(&start_time));

        let fetched = match &client {
            Some(client) => client.fetch().await,
            None => Err(BridgeError::Configuration(
                "Meteobridge address and password are required".into(),
            )),
        };

        match cycle.complete(fetched, &mut sink) {
            Ok(_) => debug!(
                "{} driver updates reported so far, last wind direction {:?}",
                sink.reports(),
                cycle.last_wind().get()
            ),
            Err(e) if e.is_configuration() => warn!("Plugin not configured yet: {}", e),
            Err(e) => error!("Poll cycle skipped, keeping previous values: {}", e),
        }

        // Wait until the next poll should start
        let elapsed = duration_to_seconds(OffsetDateTime::now_utc() - start_time);
        let wait_time = poll_secs.saturating_sub(elapsed);
        if wait_time > 0 {
            sleep(Duration::from_secs(wait_time)).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match BridgeConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            warn!("Meteobridge poll service stopped.");
        }
    }

    Ok(())
}
