// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Zip-Users API Server
//!
//! Stores users keyed by ZIP code and enriches them with coordinates and
//! UTC offset from OpenWeather.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zip_users::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryUserStore, UserStore},
    services::{UserService, WeatherService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting Zip-Users API"
    );

    // Initialize user store
    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; records are lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let weather = WeatherService::new(&config)?;
    tracing::info!(
        base_url = %config.openweather_base_url,
        country = %config.openweather_country_code,
        timeout_secs = config.upstream_timeout_secs,
        "OpenWeather client initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        user_service: UserService::new(store, weather),
    });

    // Build router
    let app = zip_users::routes::create_router(state);

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
                .add_directive("zip_users=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
