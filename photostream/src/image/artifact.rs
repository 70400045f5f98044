//! Per-size image payload slots.

use bytes::Bytes;
use parking_lot::RwLock;

/// A single size variant of an image.
///
/// The source URL is fixed at construction (or absent when the provider never
/// supplied one). The payload is only set after a successful fetch or a cache
/// hit.
#[derive(Debug, Default)]
pub struct ImageArtifact {
    url: Option<String>,
    payload: RwLock<Option<Bytes>>,
}

impl ImageArtifact {
    /// Create a slot with a known source URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            payload: RwLock::new(None),
        }
    }

    /// Create a slot with no source URL.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The loaded payload, if any.
    pub fn payload(&self) -> Option<Bytes> {
        self.payload.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.payload.read().is_some()
    }

    pub(crate) fn store(&self, data: Bytes) {
        *self.payload.write() = Some(data);
    }
}
