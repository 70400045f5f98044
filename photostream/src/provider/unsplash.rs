//! Unsplash image provider.
//!
//! # API Endpoints
//!
//! - Info: `https://api.unsplash.com/photos/{id}`
//! - Images: pre-signed URLs delivered in the listing's `urls` map
//!
//! Every request, image downloads included, carries
//! `Authorization: Client-ID {access_key}`.
//!
//! # Size Mapping
//!
//! | `urls` key | size                     |
//! |------------|--------------------------|
//! | `thumb`    | Thumbnail                |
//! | `small`    | Small                    |
//! | `regular`  | Medium                   |
//! | `full`     | Large                    |
//! | `raw`      | ExtraLarge and Original  |
//!
//! There is no URL formula: a size whose key was absent from the listing is
//! unavailable.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::image::{ImageMetadata, ImageRecord, ImageResource, ImageSize};
use crate::provider::context::FetchContext;
use crate::provider::http::AsyncHttpClient;
use crate::provider::types::{Coordinates, NormalizedInfo, ProviderError, ProviderKind};

/// Unsplash photos endpoint.
const UNSPLASH_PHOTOS_URL: &str = "https://api.unsplash.com/photos";

/// Title used when a photo has no description.
pub const UNTITLED: &str = "Untitled";

/// Photo reference as returned by the Unsplash listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnsplashPhotoRef {
    pub id: String,
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

/// The `urls` key backing a size variant.
pub fn url_key(size: ImageSize) -> &'static str {
    match size {
        ImageSize::Thumbnail => "thumb",
        ImageSize::Small => "small",
        ImageSize::Medium => "regular",
        ImageSize::Large => "full",
        ImageSize::ExtraLarge | ImageSize::Original => "raw",
    }
}

/// Builds the photo info URL.
pub fn info_url(id: &str) -> String {
    format!("{}/{}", UNSPLASH_PHOTOS_URL, id)
}

/// Decodes and normalizes a photo info body.
pub fn parse_info(body: &[u8]) -> Result<NormalizedInfo, ProviderError> {
    let info: Value = serde_json::from_slice(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    normalize_info(&info)
}

/// Normalizes a decoded Unsplash photo object.
///
/// Location is taken from the first usable source: `location.title`, then
/// `location.name`, then `location.position` (pending geocode).
pub fn normalize_info(info: &Value) -> Result<NormalizedInfo, ProviderError> {
    if !info.is_object() {
        return Err(ProviderError::MalformedResponse(
            "Unsplash response is not an object".to_string(),
        ));
    }

    let description = info
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut metadata = ImageMetadata {
        title: Some(description.clone().unwrap_or_else(|| UNTITLED.to_string())),
        author: string_at(info, "/user/name").or_else(|| string_at(info, "/user/username")),
        date: string_at(info, "/created_at"),
        description,
        location: None,
    };

    let mut pending_location = None;
    if let Some(location) = info.get("location") {
        if let Some(place) = non_empty_at(location, "/title").or_else(|| non_empty_at(location, "/name"))
        {
            metadata.location = Some(place);
        } else if let (Some(latitude), Some(longitude)) = (
            location.pointer("/position/latitude").and_then(Value::as_f64),
            location.pointer("/position/longitude").and_then(Value::as_f64),
        ) {
            pending_location = Some(Coordinates::new(
                format_coordinate(latitude),
                format_coordinate(longitude),
            ));
        }
    }

    Ok(NormalizedInfo {
        metadata,
        pending_location,
    })
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn non_empty_at(value: &Value, pointer: &str) -> Option<String> {
    string_at(value, pointer).filter(|s| !s.is_empty())
}

/// Formats a coordinate keeping a decimal point (`1.0`, not `1`).
fn format_coordinate(value: f64) -> String {
    format!("{:?}", value)
}

/// An Unsplash photo.
pub struct UnsplashImage<C: AsyncHttpClient> {
    context: Arc<FetchContext<C>>,
    record: ImageRecord,
}

impl<C: AsyncHttpClient> UnsplashImage<C> {
    /// Creates an Unsplash image from its id and `urls` map.
    pub fn new(context: Arc<FetchContext<C>>, id: impl Into<String>, urls: &HashMap<String, String>) -> Self {
        let record = ImageRecord::new(ProviderKind::Unsplash, id, |size| {
            urls.get(url_key(size)).cloned()
        });
        Self { context, record }
    }

    /// Creates an Unsplash image from a listing entry.
    pub fn from_ref(context: Arc<FetchContext<C>>, photo: UnsplashPhotoRef) -> Self {
        Self::new(context, photo.id, &photo.urls)
    }

    fn authorization(&self) -> String {
        format!("Client-ID {}", self.context.credentials().unsplash_access_key)
    }
}

impl<C: AsyncHttpClient> ImageResource for UnsplashImage<C> {
    fn record(&self) -> &ImageRecord {
        &self.record
    }

    fn image_url(&self, size: ImageSize) -> Result<String, ProviderError> {
        self.record
            .artifact(size)
            .url()
            .map(str::to_string)
            .ok_or(ProviderError::SizeUnavailable(size))
    }

    async fn fetch_data(&self, size: ImageSize) -> Result<(), ProviderError> {
        let authorization = self.authorization();
        let headers = [("Authorization", authorization.as_str())];
        self.context
            .load_data(&self.record, size, &headers, || self.image_url(size))
            .await
    }

    async fn fetch_info(&self) -> Result<(), ProviderError> {
        let url = info_url(self.record.id());
        let authorization = self.authorization();
        let headers = [("Authorization", authorization.as_str())];
        self.context
            .load_info(&self.record, &url, &headers, parse_info)
            .await
    }
}
