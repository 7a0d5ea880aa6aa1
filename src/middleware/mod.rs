// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (security headers, error diagnostics).

pub mod error_trace;
pub mod security;

pub use error_trace::attach_error_trace;
pub use security::add_security_headers;
