//! Shared data model
//!
//! Request, place and response types exchanged between the pipeline stages
//! and the HTTP surface. Everything here is created per request and dropped
//! with the response.

mod location;

pub use location::{Location, LocationError};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Message returned when the place search yields nothing
pub const NO_LOCATIONS_MESSAGE: &str = "No locations found";

/// Message returned when at least one place matched
pub const LOCATIONS_FOUND_MESSAGE: &str = "Locations found successfully";

/// Rejection raised while constructing a [`SearchRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The query is empty or whitespace only
    #[error("Query cannot be empty")]
    EmptyQuery,
}

/// Wire shape of the inbound body before validation
#[derive(Debug, Deserialize)]
struct RawSearchRequest {
    query: String,
}

/// Inbound search request
///
/// Always holds a non-empty query: both [`SearchRequest::new`] and the serde
/// path go through the same check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
}

impl SearchRequest {
    /// Create a validated request. The query is kept verbatim.
    pub fn new(query: impl Into<String>) -> Result<Self, RequestError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        Ok(Self { query })
    }

    /// Raw user query
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl<'de> Deserialize<'de> for SearchRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSearchRequest::deserialize(deserializer)?;
        Self::new(raw.query).map_err(serde::de::Error::custom)
    }
}

/// Outcome marker of a search envelope
///
/// Only `Success` exists: failures never reach the envelope, they become
/// transport-level errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
}

/// Outbound search envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub locations: Vec<Location>,
}

impl SearchResponse {
    /// Build the success envelope, picking the message from the result count
    pub fn from_locations(locations: Vec<Location>) -> Self {
        let message = if locations.is_empty() {
            NO_LOCATIONS_MESSAGE
        } else {
            LOCATIONS_FOUND_MESSAGE
        };

        Self {
            status: ResponseStatus::Success,
            message: message.to_string(),
            locations,
        }
    }

    /// Number of locations in the envelope
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the envelope carries no locations
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Body of the health check endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            message: "API is running",
        }
    }
}
