//! Place search module
//!
//! This module resolves a processed query into a short, ordered list of
//! [`Location`](crate::models::Location) records.

mod google_places;

pub use google_places::{parse_text_search, GooglePlacesClient, PlaceSearch, PlacesError, MAX_RESULTS};
