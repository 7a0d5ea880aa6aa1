// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Zip-Users: user records enriched with location data
//!
//! This crate provides the backend API for storing users keyed by ZIP code,
//! with latitude, longitude, and UTC offset looked up from OpenWeather.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::UserService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub user_service: UserService,
}
