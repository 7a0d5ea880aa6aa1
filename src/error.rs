// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Zip code {0} could not be found.")]
    ZipNotFound(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream service returned an invalid response: {0}")]
    UpstreamMalformed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Error returned by handlers when an id has no stored record.
    pub fn user_not_found() -> Self {
        AppError::NotFound("User not found".to_string())
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::ZipNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_)
            | AppError::UpstreamMalformed(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Debug rendering of the error that produced a response.
///
/// Attached to every error response as an extension; only folded into the
/// body by `middleware::error_trace` outside production.
#[derive(Debug, Clone)]
pub struct ErrorTrace(pub String);

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = match &self {
            AppError::ZipNotFound(zip) => {
                tracing::warn!(zip_code = %zip, "Geocoder could not resolve zip code");
                self.to_string()
            }
            AppError::UpstreamUnavailable(msg) | AppError::UpstreamMalformed(msg) => {
                tracing::error!(error = %msg, "Upstream API error");
                self.to_string()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Internal server error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            AppError::Validation(_) | AppError::NotFound(_) => self.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { error })).into_response();
        response
            .extensions_mut()
            .insert(ErrorTrace(format!("{:?}", self)));
        response
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
