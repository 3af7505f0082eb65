// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PolyTrade API Server
//!
//! Serves the authentication routes and the market-data/strategy proxy
//! routes used by the PolyTrade web terminal.

use polytrade_api::{config::Config, db::PgDb, services::WsServiceClient, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting PolyTrade API");

    let db = PgDb::connect(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool ready");

    let ws_service = WsServiceClient::new(
        &config.ws_service_url,
        Duration::from_secs(config.ws_service_timeout_secs),
    )?;
    tracing::info!(
        url = %config.ws_service_url,
        timeout_secs = config.ws_service_timeout_secs,
        "WS service client initialized"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        ws_service,
    });

    let app = polytrade_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("polytrade_api=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
