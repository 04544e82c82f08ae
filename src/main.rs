// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project Map API Server
//!
//! Serves transportation planning projects for an interactive map, collects
//! public comments, and lets an admin manage datasets and export CSVs.

use project_map::{config::Config, services::dataset::load_route_paths, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Project Map API");

    let state = Arc::new(AppState::new(config.clone()));
    state.library.ensure_dir().await?;

    load_initial_dataset(&state).await;

    if let Some(path) = &config.route_paths_file {
        tracing::info!(path = %path.display(), "Loading route paths");
        let paths = load_route_paths(path)?;
        tracing::info!(count = paths.len(), "Route paths loaded");
        state.store.set_route_paths(paths);
    }

    // Build router
    let app = project_map::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Activate the recorded dataset, or the default one. The server still
/// starts without a dataset; the map stays empty until an admin sets one.
async fn load_initial_dataset(state: &AppState) {
    let filename = match state.library.active().await {
        Some(name) => name,
        None => state.config.default_dataset.clone(),
    };

    match state.library.load(&filename).await {
        Ok(collection) => state.store.replace_dataset(filename, collection),
        Err(e) => {
            tracing::warn!(filename = %filename, error = %e, "No dataset loaded at startup");
        }
    }
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
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("project_map=debug,info")),
        )
        .with(format)
        .init();
}
