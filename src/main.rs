// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Dashboard Server
//!
//! Fetches running activities from Strava at startup and serves monthly
//! distance, time, elevation, location and heart-rate charts.

use std::sync::Arc;
use strava_dashboard::{config::Config, services::DashboardService, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment; missing secrets stop startup here
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
    })?;
    tracing::info!(
        port = config.port,
        refresh_secs = config.refresh_interval.as_secs(),
        refetch_on_tick = config.refetch_on_tick,
        "Starting Strava Dashboard"
    );

    // Startup fetch: token exchange + paginated activity download
    let dashboard = DashboardService::start(&config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to fetch Strava activities");
    })?;
    let dashboard = Arc::new(dashboard);
    let _refresh_task = dashboard.clone().spawn_refresh_loop(config.refresh_interval);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        dashboard,
    });

    // Build router
    let app = strava_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_dashboard=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
