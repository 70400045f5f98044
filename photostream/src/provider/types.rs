//! Shared provider types and errors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::image::{ImageMetadata, ImageSize};

/// Errors surfaced by image resource fetches.
///
/// Every variant aborts the enclosing fetch. Geocoding failures never appear
/// here; they are logged and swallowed by the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Connection-level failure (DNS, TLS, timeout, reset).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The response body was not in the expected encoding or shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The body decoded but violates the provider's schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A section the provider always returns was absent.
    #[error("Missing required section: {0}")]
    MissingSection(&'static str),

    /// No URL is known for the requested size.
    #[error("URL for size {0} is unavailable")]
    SizeUnavailable(ImageSize),

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Image provider tag.
///
/// Determines the cache namespace and wire format of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Flickr,
    Unsplash,
}

impl ProviderKind {
    /// Lowercase name, used as the cache namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Flickr => "flickr",
            ProviderKind::Unsplash => "unsplash",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flickr" => Ok(ProviderKind::Flickr),
            "unsplash" => Ok(ProviderKind::Unsplash),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Raw coordinate pair awaiting reverse geocoding.
///
/// Kept as strings because that is what the geocoding service consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

/// Output of a provider's metadata normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInfo {
    /// Every field that could be read synchronously from the response.
    pub metadata: ImageMetadata,

    /// Coordinates to resolve into `metadata.location`, when the response
    /// carried no usable place name.
    pub pending_location: Option<Coordinates>,
}

/// API credentials attached to outgoing requests.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    /// Flickr API key, sent as the `api_key` query parameter.
    pub flickr_api_key: String,

    /// Unsplash access key, sent as `Authorization: Client-ID <key>`.
    pub unsplash_access_key: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("flickr_api_key", &redact(&self.flickr_api_key))
            .field("unsplash_access_key", &redact(&self.unsplash_access_key))
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trip() {
        for kind in [ProviderKind::Flickr, ProviderKind::Unsplash] {
            assert_eq!(kind.to_string().parse::<ProviderKind>(), Ok(kind));
        }
        assert!("picasa".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_size_unavailable_display() {
        let err = ProviderError::SizeUnavailable(ImageSize::ExtraLarge);
        assert_eq!(err.to_string(), "URL for size extra-large is unavailable");
    }

    #[test]
    fn test_http_status_display() {
        let err = ProviderError::HttpStatus {
            status: 404,
            url: "https://api.unsplash.com/photos/x".to_string(),
        };
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_credentials_debug_hides_keys() {
        let creds = ProviderCredentials {
            flickr_api_key: "secret".to_string(),
            unsplash_access_key: String::new(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<unset>"));
    }
}
