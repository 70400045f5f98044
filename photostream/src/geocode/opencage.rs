//! OpenCage reverse geocoder.
//!
//! # API Endpoint
//!
//! `https://api.opencagedata.com/geocode/v1/json?q={lat}+{lon}&key={key}&no_annotations=1&limit=1`
//!
//! The first result's `formatted` field is used as the place name.

use serde::Deserialize;
use tracing::debug;

use super::{GeocodeError, ReverseGeocoder};
use crate::cache::BoxFuture;
use crate::provider::AsyncHttpClient;

const OPENCAGE_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    formatted: Option<String>,
}

/// Reverse geocoder backed by the OpenCage API.
pub struct OpenCageGeocoder<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
}

impl<C: AsyncHttpClient> OpenCageGeocoder<C> {
    /// Creates a new geocoder.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `api_key` - OpenCage API key
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
        }
    }

    fn build_url(&self, latitude: &str, longitude: &str) -> String {
        format!(
            "{}?q={}+{}&key={}&no_annotations=1&limit=1",
            OPENCAGE_BASE_URL, latitude, longitude, self.api_key
        )
    }
}

/// Extract the formatted place name from an OpenCage response body.
fn parse_formatted(body: &[u8], latitude: &str, longitude: &str) -> Result<String, GeocodeError> {
    let response: OpenCageResponse =
        serde_json::from_slice(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    response
        .results
        .into_iter()
        .find_map(|r| r.formatted.filter(|f| !f.is_empty()))
        .ok_or_else(|| GeocodeError::NoResults {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        })
}

impl<C: AsyncHttpClient> ReverseGeocoder for OpenCageGeocoder<C> {
    fn reverse_geocode<'a>(
        &'a self,
        latitude: &'a str,
        longitude: &'a str,
    ) -> BoxFuture<'a, Result<String, GeocodeError>> {
        Box::pin(async move {
            let url = self.build_url(latitude, longitude);
            debug!(latitude, longitude, "Reverse geocoding");
            let body = self.http_client.get(&url, &[]).await?;
            parse_formatted(&body, latitude, longitude)
        })
    }
}
