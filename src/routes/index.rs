// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service banner and health check.

use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}

#[derive(Serialize)]
pub struct Endpoints {
    pub users: &'static str,
    pub ui: &'static str,
}

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

/// Root endpoint: what this service is and where to find it.
async fn banner(State(state): State<Arc<AppState>>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: format!("Welcome to the {} API", state.config.service_name),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            users: "/api/users",
            ui: "/ui",
        },
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}
