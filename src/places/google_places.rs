//! Google Places Text Search client
//!
//! Sends the processed query to `textsearch/json` and decodes the reply with
//! an explicit schema. Missing required fields fail the whole call.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::app_config::AppConfig;
use crate::models::{Location, LocationError};

/// Fixed cap on the number of places returned per search
pub const MAX_RESULTS: usize = 5;

/// Provider status meaning the result list is usable
const STATUS_OK: &str = "OK";

/// Provider status for an empty but valid search
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Place search errors
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network error (connection failed, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx HTTP status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Body is not the expected JSON envelope
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A retained result entry could not be decoded into a location
    #[error("Malformed result entry {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::Network(err.to_string())
    }
}

/// Looks up places for a processed query
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Return at most [`MAX_RESULTS`] locations in provider order.
    async fn search(&self, query: &str) -> Result<Vec<Location>, PlacesError>;
}

// =============================================================================
// Wire schema
// =============================================================================

#[derive(Debug, Deserialize)]
struct TextSearchEnvelope {
    status: String,
    results: Option<Vec<serde_json::Value>>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: String,
    formatted_address: String,
    geometry: RawGeometry,
    place_id: String,
    types: Vec<String>,
    #[serde(default)]
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl RawPlace {
    fn into_location(self) -> Result<Location, LocationError> {
        Ok(Location::new(
            self.place_id,
            self.name,
            self.formatted_address,
            self.geometry.location.lat,
            self.geometry.location.lng,
        )?
        .with_types(self.types)
        .with_rating(self.rating))
    }
}

/// Decode a Text Search response body
///
/// A status other than `OK` yields an empty list. Otherwise `results` must be
/// present and the first [`MAX_RESULTS`] entries are decoded in order; entries
/// past the cutoff are never inspected.
pub fn parse_text_search(body: &str) -> Result<Vec<Location>, PlacesError> {
    let envelope: TextSearchEnvelope =
        serde_json::from_str(body).map_err(|e| PlacesError::Parse(e.to_string()))?;

    if envelope.status != STATUS_OK {
        if envelope.status == STATUS_ZERO_RESULTS {
            tracing::debug!("Places search returned no results");
        } else {
            tracing::warn!(
                status = %envelope.status,
                error_message = envelope.error_message.as_deref().unwrap_or(""),
                "Places search did not succeed, treating as no results"
            );
        }
        return Ok(Vec::new());
    }

    let results = envelope
        .results
        .ok_or_else(|| PlacesError::Parse("missing field `results`".to_string()))?;

    results
        .into_iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(index, value)| {
            let raw: RawPlace =
                serde_json::from_value(value).map_err(|e| PlacesError::MalformedEntry {
                    index,
                    reason: e.to_string(),
                })?;
            raw.into_location().map_err(|e| PlacesError::MalformedEntry {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

// =============================================================================
// Client
// =============================================================================

/// Google Places Text Search client
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GooglePlacesClient {
    /// Places API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api/place";

    /// Create a new client against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, None, None)
    }

    /// Create client with custom configuration
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        }
    }

    /// Create from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .google_maps_api_key()
            .ok_or_else(|| anyhow!("google_maps_api_key is not configured"))?;
        Ok(Self::with_config(
            api_key,
            Some(config.places_base_url().to_string()),
            config.request_timeout_secs().map(Duration::from_secs),
        ))
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn search(&self, query: &str) -> Result<Vec<Location>, PlacesError> {
        let url = format!("{}/textsearch/json", self.base_url);

        let mut builder = self
            .client
            .get(&url)
            .query(&[("query", query), ("key", self.api_key.as_str())]);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error_message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_text_search(&body)
    }
}
