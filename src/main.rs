// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OSDATUM lookup tool
//!
//! Loads the grid dataset, resolves the current entitlement, and answers
//! "which grid contains this coordinate and may I see it" for a
//! latitude/longitude pair given on the command line.

use osdatum::{
    config::Config,
    gate,
    models::SearchCoordinates,
    services::GridDataset,
    AppState,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api = %config.api_base_url, "Starting OSDATUM client");

    let state = AppState::new(config.clone());

    // Background credential expiry monitor
    state
        .store
        .spawn_expiry_monitor(Duration::from_secs(config.expiry_check_secs));

    // Load the grid dataset
    tracing::info!(path = %config.dataset_path, "Loading grid dataset");
    let dataset = if config.dataset_path.starts_with("http") {
        GridDataset::fetch(&config.dataset_path).await?
    } else {
        GridDataset::load_from_file(&config.dataset_path)?
    };

    // Resolve entitlement for whatever credential is stored
    let credential = state.store.credential();
    let entitlement = state.resolver.resolve(credential.as_ref()).await;
    tracing::info!(
        tier = ?entitlement.tier,
        purchased = entitlement.purchased_grids.len(),
        "Entitlement resolved"
    );

    // Optional coordinate lookup from the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [lat, lon] = args.as_slice() {
        let coords = match SearchCoordinates::parse(lat, lon) {
            Ok(coords) => coords,
            Err(e) => {
                tracing::error!(error = %e, "Invalid search coordinates");
                return Ok(());
            }
        };

        match dataset.find_containing(coords.lat, coords.lon) {
            Some(feature) => {
                let decision = gate::decide(&entitlement, &feature.id);
                tracing::info!(
                    grid = %feature.id.padded(),
                    area = %feature.area(),
                    available_datums = feature.available_datums(),
                    ?decision,
                    "Grid found"
                );
            }
            None => {
                tracing::info!(
                    lat = coords.lat,
                    lon = coords.lon,
                    "No data available for this location"
                );
            }
        }
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("osdatum=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
