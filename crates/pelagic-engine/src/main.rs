//! Habitat server binary for the Pelagic service.
//!
//! This is the main entry point that wires together the ocean field
//! loader, the trophic cascade stepper, and the HTTP API. It loads
//! configuration, builds the shared state, and serves requests until
//! the process is terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `pelagic-config.yaml`
//! 3. Build the ocean field set (grid file or synthetic fallback)
//! 4. Create the shared application state
//! 5. Start the HTTP server
//! 6. Wait for Ctrl-C

mod config;
mod error;

use pelagic_api::AppState;
use pelagic_api::fields::OceanFields;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Application entry point for the habitat server.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("pelagic-engine starting");

    // 2. Load configuration.
    let config = AppConfig::load()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        tick_interval_ms = config.cascade.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Build the ocean field set.
    let fields = OceanFields::from_config(&config.fields);
    let (rows, cols) = fields.shape();
    info!(rows, cols, "Ocean fields ready");

    // 4. Create the shared application state.
    let state = AppState::new(fields, config.cascade, config.fields.seed);

    // 5. Start the HTTP server.
    let (addr, server_handle) = pelagic_api::spawn_server(&config.server, state).await?;
    info!(%addr, "Habitat API server started");

    // 6. Wait for Ctrl-C or a fatal server error.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = server_handle => {
            match result {
                Ok(Ok(())) => info!("Server stopped"),
                Ok(Err(e)) => return Err(Box::new(e) as Box<dyn std::error::Error>),
                Err(e) => return Err(Box::new(e) as Box<dyn std::error::Error>),
            }
        }
    }

    info!("pelagic-engine stopped");
    Ok(())
}
