// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip_users::config::Config;
use zip_users::db::{FirestoreDb, MemoryUserStore};
use zip_users::routes::create_router;
use zip_users::services::{UserService, WeatherService};
use zip_users::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// App under test with its in-memory store and stubbed OpenWeather server.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: MemoryUserStore,
    pub upstream: MockServer,
}

/// Create a test app in development mode.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    create_test_app_with(Config::default()).await
}

/// Create a test app from `config`, pointing OpenWeather at a mock server.
#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> TestApp {
    let upstream = MockServer::start().await;
    let config = Config {
        openweather_base_url: upstream.uri(),
        ..config
    };

    let store = MemoryUserStore::new();
    let weather = WeatherService::new(&config).expect("weather client");
    let user_service = UserService::new(Arc::new(store.clone()), weather);

    let state = Arc::new(AppState {
        config,
        user_service,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        upstream,
    }
}

/// Stub both OpenWeather endpoints for one ZIP code.
#[allow(dead_code)]
pub async fn mount_location(server: &MockServer, zip: &str, lat: f64, lon: f64, timezone: i64) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", format!("{},US", zip)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "zip": zip,
            "lat": lat,
            "lon": lon,
            "country": "US"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", lat.to_string()))
        .and(query_param("lon", lon.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": timezone
        })))
        .mount(server)
        .await;
}

/// Stub the geocoder to report `zip` as unknown.
#[allow(dead_code)]
pub async fn mount_unknown_zip(server: &MockServer, zip: &str) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", format!("{},US", zip)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "not found"
        })))
        .mount(server)
        .await;
}

/// Number of requests the mock server saw for `request_path`.
#[allow(dead_code)]
pub async fn upstream_calls(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

/// Send a request and decode the JSON response (Null for empty bodies).
#[allow(dead_code)]
pub async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
