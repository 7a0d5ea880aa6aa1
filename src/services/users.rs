// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User service: orchestrates enrichment and persistence.
//!
//! Absence is reported as `None`/`false`, never as an error; handlers
//! decide how to present it. Enrichment runs before any store write, so
//! an upstream failure leaves the stored record untouched.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{User, UserUpdate};
use crate::services::WeatherService;
use std::sync::Arc;

/// Business logic for user records.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    weather: WeatherService,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, weather: WeatherService) -> Self {
        Self { store, weather }
    }

    /// Create a user, enriching it from `zip_code`.
    pub async fn create_user(&self, name: &str, zip_code: &str) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let location = self.weather.get_location_data(zip_code).await?;

        let user = User {
            id,
            name: name.trim().to_string(),
            zip_code: zip_code.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: location.timezone,
        };

        self.store.put(&user.id, &user).await?;
        tracing::info!(user_id = %user.id, zip_code = %user.zip_code, "User created");
        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, AppError> {
        self.store.get_all().await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.store.get(id).await
    }

    /// Apply `updates` to an existing user and store the merged record.
    ///
    /// Enrichment re-runs only when the ZIP code actually changes.
    pub async fn update_user(
        &self,
        id: &str,
        updates: UserUpdate,
    ) -> Result<Option<User>, AppError> {
        let Some(existing) = self.store.get(id).await? else {
            return Ok(None);
        };

        let mut updated = existing.clone();

        if let Some(name) = updates.name {
            updated.name = name.trim().to_string();
        }

        if let Some(zip_code) = updates.zip_code {
            if zip_code != existing.zip_code {
                let location = self.weather.get_location_data(&zip_code).await?;
                updated.zip_code = zip_code;
                updated.latitude = location.latitude;
                updated.longitude = location.longitude;
                updated.timezone = location.timezone;
            }
        }

        self.store.put(id, &updated).await?;
        tracing::info!(
            user_id = id,
            zip_changed = updated.zip_code != existing.zip_code,
            "User updated"
        );
        Ok(Some(updated))
    }

    /// Delete a user. Returns `false` if there was nothing to delete.
    pub async fn delete_user(&self, id: &str) -> Result<bool, AppError> {
        let existed = self.store.delete(id).await?;
        if existed {
            tracing::info!(user_id = id, "User deleted");
        }
        Ok(existed)
    }
}

/// Render a UTC offset in seconds as decimal hours, e.g. `UTC-5` or `UTC+5.5`.
pub fn format_utc_offset(timezone_seconds: i64) -> String {
    let hours = timezone_seconds as f64 / 3600.0;
    let sign = if hours >= 0.0 { '+' } else { '-' };
    format!("UTC{}{}", sign, hours.abs())
}
