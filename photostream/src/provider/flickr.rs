//! Flickr image provider.
//!
//! # URL Patterns
//!
//! - Image: `https://farm{farm}.staticflickr.com/{server}/{id}_{secret}_{letter}.jpg`
//! - Info: `https://api.flickr.com/services/rest/?method=flickr.photos.getInfo&api_key={key}&photo_id={id}&format=json`
//!
//! Image URLs are derived from the (farm, server, id, secret) tuple returned
//! by the listing APIs, so every size variant is always resolvable.
//!
//! # Response Wrapping
//!
//! With `format=json` Flickr wraps the body in a JSONP callback:
//! `jsonFlickrApi({...})`. [`unwrap_jsonp`] strips it before decoding.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::image::{ImageMetadata, ImageRecord, ImageResource, ImageSize};
use crate::provider::context::FetchContext;
use crate::provider::http::AsyncHttpClient;
use crate::provider::types::{Coordinates, NormalizedInfo, ProviderError, ProviderKind};

/// Flickr REST endpoint.
const FLICKR_REST_URL: &str = "https://api.flickr.com/services/rest/";

const JSONP_PREFIX: &str = "jsonFlickrApi(";
const JSONP_SUFFIX: &str = ")";

/// Photo reference as returned by `flickr.photos.search` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlickrPhotoRef {
    pub id: String,
    pub farm: u32,
    pub server: String,
    pub secret: String,
}

/// Flickr size suffix letter.
///
/// See <https://www.flickr.com/services/api/misc.urls.html>.
pub fn size_letter(size: ImageSize) -> &'static str {
    match size {
        ImageSize::Thumbnail => "t",
        ImageSize::Small => "n",
        ImageSize::Medium => "c",
        ImageSize::Large => "b",
        ImageSize::ExtraLarge => "k",
        ImageSize::Original => "o",
    }
}

/// Builds a static image URL. Pure and deterministic.
pub fn image_url(farm: u32, server: &str, id: &str, secret: &str, size: ImageSize) -> String {
    format!(
        "https://farm{}.staticflickr.com/{}/{}_{}_{}.jpg",
        farm,
        server,
        id,
        secret,
        size_letter(size)
    )
}

/// Builds the `flickr.photos.getInfo` URL.
pub fn info_url(api_key: &str, id: &str) -> String {
    format!(
        "{}?method=flickr.photos.getInfo&api_key={}&photo_id={}&format=json",
        FLICKR_REST_URL, api_key, id
    )
}

/// Strips the `jsonFlickrApi(...)` wrapper and decodes the JSON inside.
///
/// A body without the wrapper (e.g. requested with `nojsoncallback=1`) is
/// decoded as-is.
pub fn unwrap_jsonp(body: &[u8]) -> Result<Value, ProviderError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ProviderError::Decode(format!("Flickr response is not UTF-8: {}", e)))?
        .trim();

    let json = text
        .strip_prefix(JSONP_PREFIX)
        .and_then(|inner| inner.strip_suffix(JSONP_SUFFIX))
        .unwrap_or(text);

    serde_json::from_str(json).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Normalizes a decoded `flickr.photos.getInfo` response.
///
/// Fails only on `stat != "ok"` or a missing `photo` object; every other
/// field is optional.
pub fn normalize_info(info: &Value) -> Result<NormalizedInfo, ProviderError> {
    if !info.is_object() {
        return Err(ProviderError::MalformedResponse(
            "Flickr response is not an object".to_string(),
        ));
    }

    match info.get("stat").and_then(Value::as_str) {
        Some("ok") => {}
        stat => {
            let message = info
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(ProviderError::MalformedResponse(format!(
                "Flickr stat {:?}: {}",
                stat.unwrap_or("<missing>"),
                message
            )));
        }
    }

    let photo = info
        .get("photo")
        .filter(|p| p.is_object())
        .ok_or(ProviderError::MissingSection("photo"))?;

    let metadata = ImageMetadata {
        title: non_empty_str(photo, "/title/_content"),
        author: string_at(photo, "/owner/realname")
            .or_else(|| string_at(photo, "/owner/username")),
        date: photo
            .pointer("/dates/taken")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: photo
            .pointer("/description/_content")
            .and_then(Value::as_str)
            .map(str::to_string),
        location: None,
    };

    let pending_location = match (
        coordinate(photo, "/location/latitude"),
        coordinate(photo, "/location/longitude"),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => None,
    };

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

fn non_empty_str(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Flickr sends coordinates as strings; numbers are accepted too.
fn coordinate(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A Flickr photo.
pub struct FlickrImage<C: AsyncHttpClient> {
    context: Arc<FetchContext<C>>,
    farm: u32,
    server: String,
    secret: String,
    record: ImageRecord,
}

impl<C: AsyncHttpClient> FlickrImage<C> {
    /// Creates a Flickr image from its key tuple.
    pub fn new(
        context: Arc<FetchContext<C>>,
        id: impl Into<String>,
        farm: u32,
        server: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let server = server.into();
        let secret = secret.into();
        let record = ImageRecord::new(ProviderKind::Flickr, id.clone(), |size| {
            Some(image_url(farm, &server, &id, &secret, size))
        });

        Self {
            context,
            farm,
            server,
            secret,
            record,
        }
    }

    /// Creates a Flickr image from a listing entry.
    pub fn from_ref(context: Arc<FetchContext<C>>, photo: FlickrPhotoRef) -> Self {
        Self::new(context, photo.id, photo.farm, photo.server, photo.secret)
    }

    pub fn farm(&self) -> u32 {
        self.farm
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    fn info_url(&self) -> String {
        info_url(&self.context.credentials().flickr_api_key, self.record.id())
    }
}

impl<C: AsyncHttpClient> ImageResource for FlickrImage<C> {
    fn record(&self) -> &ImageRecord {
        &self.record
    }

    fn image_url(&self, size: ImageSize) -> Result<String, ProviderError> {
        Ok(image_url(
            self.farm,
            &self.server,
            self.record.id(),
            &self.secret,
            size,
        ))
    }

    async fn fetch_data(&self, size: ImageSize) -> Result<(), ProviderError> {
        self.context
            .load_data(&self.record, size, &[], || self.image_url(size))
            .await
    }

    async fn fetch_info(&self) -> Result<(), ProviderError> {
        let url = self.info_url();
        self.context
            .load_info(&self.record, &url, &[], |body| {
                normalize_info(&unwrap_jsonp(body)?)
            })
            .await
    }
}
