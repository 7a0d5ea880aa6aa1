// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diagnostic traces on error responses (non-production only).
//!
//! `AppError` responses carry an `ErrorTrace` extension. When this layer is
//! installed, the trace is added to the JSON body as `"trace"`. Production
//! routers do not install it, so the extension never leaves the process.

use crate::error::ErrorTrace;
use axum::{
    body::Body,
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// Error bodies are tiny; anything larger is passed through untouched.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Fold the `ErrorTrace` extension into the JSON error body.
pub async fn attach_error_trace(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(ErrorTrace(trace)) = response.extensions().get::<ErrorTrace>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut json: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(json) => json,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    if let Some(object) = json.as_object_mut() {
        object.insert("trace".to_string(), serde_json::Value::String(trace));
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(json.to_string()))
}
