// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod users;
pub mod weather;

pub use users::{format_utc_offset, UserService};
pub use weather::{Coordinates, LocationData, WeatherService};
