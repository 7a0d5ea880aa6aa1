// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User CRUD routes.
//!
//! Request bodies are validated here, before the service or any
//! upstream API is touched. A `None` from the service becomes a 404.

use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UtcOffsetResponse};
use crate::services::format_utc_offset;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/utc-offset", get(get_utc_offset))
}

/// Reject bodies that are not JSON objects of the expected shape.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e.body_text())))
}

/// Create a user from `{name, zip_code}`.
async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let (name, zip_code) = json_body(payload)?.into_validated()?;

    let user = state.user_service.create_user(&name, &zip_code).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    let users = state.user_service.get_all_users().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    state
        .user_service
        .get_user_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(AppError::user_not_found)
}

/// Update `name` and/or `zip_code`; a changed ZIP re-runs enrichment.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let updates = json_body(payload)?.into_validated()?;

    state
        .user_service
        .update_user(&id, updates)
        .await?
        .map(Json)
        .ok_or_else(AppError::user_not_found)
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.user_service.delete_user(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::user_not_found())
    }
}

/// Report the stored timezone both in seconds and as `UTC±H`.
async fn get_utc_offset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UtcOffsetResponse>> {
    let user = state
        .user_service
        .get_user_by_id(&id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    Ok(Json(UtcOffsetResponse {
        utc_offset: format_utc_offset(user.timezone),
        id,
        zip_code: user.zip_code,
        timezone_seconds: user.timezone,
    }))
}
