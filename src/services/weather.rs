// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenWeather API client for location enrichment.
//!
//! Handles:
//! - ZIP code geocoding (`/geo/1.0/zip`)
//! - Timezone lookup via current weather (`/data/2.5/weather`)
//!
//! There are no retries and no caching; each call is bounded by the
//! client timeout.

use crate::config::Config;
use crate::error::AppError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Coordinates for a ZIP code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Derived fields stored on a user record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds offset from UTC
    pub timezone: i64,
}

/// Geocoding API response (only the fields we use).
#[derive(Debug, Deserialize)]
struct ZipGeocodeResponse {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Current weather API response (only the fields we use).
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    timezone: Option<i64>,
}

/// OpenWeather API client.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    country_code: String,
}

impl WeatherService {
    /// Create a client from application configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            api_key: config.openweather_api_key.clone(),
            country_code: config.openweather_country_code.clone(),
        })
    }

    /// Resolve a ZIP code to coordinates.
    ///
    /// A 400 or 404 from the geocoder means the ZIP is unknown and maps to
    /// `AppError::ZipNotFound`.
    pub async fn geocode_zip(&self, zip: &str) -> Result<Coordinates, AppError> {
        let url = format!("{}/geo/1.0/zip", self.base_url);
        tracing::debug!(zip_code = zip, "Geocoding zip code");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("zip", format!("{},{}", zip, self.country_code)),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| request_failed("Geocoding", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(AppError::ZipNotFound(zip.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Geocoding API request failed");
            return Err(AppError::UpstreamUnavailable(format!(
                "Geocoding API HTTP {}",
                status
            )));
        }

        let body: ZipGeocodeResponse = response.json().await.map_err(|e| {
            AppError::UpstreamMalformed(format!("Geocoding API JSON parse error: {}", e.without_url()))
        })?;

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(AppError::UpstreamMalformed(
                "Geocoding API returned invalid lat/lon".to_string(),
            )),
        }
    }

    /// Fetch the UTC offset in seconds for a coordinate pair.
    pub async fn fetch_timezone_seconds(&self, coords: Coordinates) -> Result<i64, AppError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "Fetching timezone"
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| request_failed("Current Weather", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Current Weather API request failed");
            return Err(AppError::UpstreamUnavailable(format!(
                "Current Weather API HTTP {}",
                status
            )));
        }

        let body: CurrentWeatherResponse = response.json().await.map_err(|e| {
            AppError::UpstreamMalformed(format!(
                "Current Weather API JSON parse error: {}",
                e.without_url()
            ))
        })?;

        body.timezone.ok_or_else(|| {
            AppError::UpstreamMalformed("Current Weather API returned invalid timezone".to_string())
        })
    }

    /// Geocode a ZIP code, then look up its timezone.
    ///
    /// The first failure aborts; there is no partial result.
    pub async fn get_location_data(&self, zip: &str) -> Result<LocationData, AppError> {
        let coords = self.geocode_zip(zip).await?;
        let timezone = self.fetch_timezone_seconds(coords).await?;

        Ok(LocationData {
            latitude: coords.latitude,
            longitude: coords.longitude,
            timezone,
        })
    }
}

/// Map a transport-level failure. The URL is dropped because it carries the API key.
fn request_failed(api: &str, err: reqwest::Error) -> AppError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.without_url().to_string()
    };
    AppError::UpstreamUnavailable(format!("{} API request failed: {}", api, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> WeatherService {
        let config = Config {
            openweather_base_url: server.uri(),
            upstream_timeout_secs: 1,
            ..Config::default()
        };
        WeatherService::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_sends_zip_with_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .and(query_param("zip", "10001,US"))
            .and(query_param("appid", "test_api_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "zip": "10001",
                "name": "New York",
                "lat": 40.75,
                "lon": -73.99,
                "country": "US"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let coords = service_for(&server).geocode_zip("10001").await.unwrap();
        assert_eq!(
            coords,
            Coordinates {
                latitude: 40.75,
                longitude: -73.99
            }
        );
    }

    #[tokio::test]
    async fn test_geocode_not_found_maps_to_zip_not_found() {
        for status in [400, 404] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/geo/1.0/zip"))
                .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                    "cod": "404",
                    "message": "not found"
                })))
                .mount(&server)
                .await;

            let err = service_for(&server).geocode_zip("99999").await.unwrap_err();
            assert!(
                matches!(&err, AppError::ZipNotFound(zip) if zip == "99999"),
                "status {} gave {:?}",
                status,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_geocode_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = service_for(&server).geocode_zip("10001").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_geocode_missing_coordinates_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "lat": 40.75 })),
            )
            .mount(&server)
            .await;

        let err = service_for(&server).geocode_zip("10001").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamMalformed(_)));
    }

    #[tokio::test]
    async fn test_geocode_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "lat": 1.0, "lon": 2.0 }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = service_for(&server).geocode_zip("10001").await.unwrap_err();
        match err {
            AppError::UpstreamUnavailable(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timezone_extracts_seconds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "40.75"))
            .and(query_param("lon", "-73.99"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "New York",
                "timezone": -18000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tz = service_for(&server)
            .fetch_timezone_seconds(Coordinates {
                latitude: 40.75,
                longitude: -73.99,
            })
            .await
            .unwrap();
        assert_eq!(tz, -18000);
    }

    #[tokio::test]
    async fn test_timezone_non_numeric_is_malformed() {
        for body in [
            serde_json::json!({ "name": "Nowhere" }),
            serde_json::json!({ "timezone": "EST" }),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/data/2.5/weather"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;

            let err = service_for(&server)
                .fetch_timezone_seconds(Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::UpstreamMalformed(_)));
        }
    }

    #[tokio::test]
    async fn test_upstream_error_body_stays_out_of_message() {
        let server = MockServer::start().await;
        for api_path in ["/geo/1.0/zip", "/data/2.5/weather"] {
            Mock::given(method("GET"))
                .and(path(api_path))
                .respond_with(
                    ResponseTemplate::new(401).set_body_string("Invalid API key test_api_key"),
                )
                .mount(&server)
                .await;
        }
        let service = service_for(&server);

        let err = service.geocode_zip("10001").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upstream service unavailable: Geocoding API HTTP 401 Unauthorized"
        );

        let err = service
            .fetch_timezone_seconds(Coordinates {
                latitude: 40.75,
                longitude: -73.99,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upstream service unavailable: Current Weather API HTTP 401 Unauthorized"
        );
        assert!(!format!("{:?}", err).contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_location_data_stops_after_geocode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "timezone": 0
            })))
            .expect(0)
            .mount(&server)
            .await;

        let err = service_for(&server)
            .get_location_data("99999")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ZipNotFound(_)));
    }

    #[tokio::test]
    async fn test_location_data_combines_both_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/zip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lat": 37.38,
                "lon": -122.08
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "timezone": -25200
            })))
            .mount(&server)
            .await;

        let data = service_for(&server)
            .get_location_data("94040")
            .await
            .unwrap();
        assert_eq!(
            data,
            LocationData {
                latitude: 37.38,
                longitude: -122.08,
                timezone: -25200
            }
        );
    }
}
