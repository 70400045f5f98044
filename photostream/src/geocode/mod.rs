//! Reverse geocoding for metadata enrichment.
//!
//! Providers sometimes return only raw coordinates for a photo's location.
//! A [`ReverseGeocoder`] turns those into a human-readable place string.
//! Enrichment is best-effort: the fetch pipeline logs a [`GeocodeError`] and
//! carries on without a location.

mod opencage;

pub use opencage::OpenCageGeocoder;

use thiserror::Error;

use crate::cache::BoxFuture;
use crate::provider::ProviderError;

/// Errors from a reverse geocoding call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request itself failed.
    #[error("Geocoding request failed: {0}")]
    Http(#[from] ProviderError),

    /// The response could not be decoded.
    #[error("Geocoding response could not be decoded: {0}")]
    Decode(String),

    /// The service answered but had nothing for these coordinates.
    #[error("No place found for {latitude},{longitude}")]
    NoResults { latitude: String, longitude: String },
}

/// Converts a latitude/longitude pair into a formatted place name.
///
/// Dyn-compatible so a single geocoder can be shared by resources of every
/// provider.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse_geocode<'a>(
        &'a self,
        latitude: &'a str,
        longitude: &'a str,
    ) -> BoxFuture<'a, Result<String, GeocodeError>>;
}
