//! Location record

use serde::Serialize;
use thiserror::Error;

/// Reasons a place cannot become a [`Location`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("place_id is empty")]
    EmptyPlaceId,

    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A matched place
///
/// Fields are private: a `Location` is validated once in [`Location::new`]
/// and read-only afterwards. `rating` is the only optional value and
/// serializes as `null` when the provider gave none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    formatted_address: String,
    latitude: f64,
    longitude: f64,
    place_id: String,
    types: Vec<String>,
    rating: Option<f64>,
}

impl Location {
    /// Create a location with no type tags and no rating
    pub fn new(
        place_id: impl Into<String>,
        name: impl Into<String>,
        formatted_address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, LocationError> {
        let place_id = place_id.into();
        if place_id.trim().is_empty() {
            return Err(LocationError::EmptyPlaceId);
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::InvalidLongitude(longitude));
        }

        Ok(Self {
            name: name.into(),
            formatted_address: formatted_address.into(),
            latitude,
            longitude,
            place_id,
            types: Vec::new(),
            rating: None,
        })
    }

    /// Set the type tags
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Set the rating
    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formatted_address(&self) -> &str {
        &self.formatted_address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }
}
