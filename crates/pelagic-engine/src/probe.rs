//! Endpoint probe binary for the habitat server.
//!
//! Calls every REST endpoint once against a running server and logs
//! what came back. Useful as a smoke test after deployment and as a
//! living example of the [`HabitatClient`] API.
//!
//! The target server is taken from `PELAGIC_API_URL`, defaulting to
//! `http://127.0.0.1:5000`.

use pelagic_client::HabitatClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the server to probe.
const API_URL_ENV: &str = "PELAGIC_API_URL";

/// Default server address when the environment variable is unset.
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| String::from(DEFAULT_API_URL));
    info!(base_url, "probing habitat server");

    let client = HabitatClient::new(base_url)?;
    let mut failures = 0u32;

    match client.health().await {
        Ok(health) => info!(status = health.status, version = health.version, "health"),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("health failed: {e}");
        }
    }

    match client.dataset_info().await {
        Ok(info_body) => info!(
            data_source = info_body.data_source,
            resolution = info_body.spatial_resolution,
            "dataset info"
        ),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("dataset info failed: {e}");
        }
    }

    match client.basic_prediction().await {
        Ok(prediction) => info!(
            method = prediction.method,
            mean = prediction.statistics.mean,
            "basic prediction"
        ),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("basic prediction failed: {e}");
        }
    }

    match client.advanced_prediction().await {
        Ok(prediction) => info!(
            method = prediction.method,
            components = prediction.components.len(),
            "advanced prediction"
        ),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("advanced prediction failed: {e}");
        }
    }

    match client.trophic_timeseries().await {
        Ok(series) => info!(levels = series.trophic_cascade.len(), "trophic timeseries"),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("trophic timeseries failed: {e}");
        }
    }

    match client.simulate_tag(4.0).await {
        Ok(simulation) => info!(
            samples = simulation.simulation_results.behavioral_states.len(),
            feeding_events = simulation.simulation_results.feeding_events.len(),
            "tag simulation"
        ),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("tag simulation failed: {e}");
        }
    }

    match client.educational_content().await {
        Ok(content) => info!(
            title = content.title,
            sections = content.sections.len(),
            "educational content"
        ),
        Err(e) => {
            failures = failures.saturating_add(1);
            error!("educational content failed: {e}");
        }
    }

    if failures > 0 {
        error!(failures, "probe finished with failures");
        std::process::exit(1);
    }

    info!("probe finished, all endpoints healthy");
    Ok(())
}
