//! State owned by every image resource, independent of provider.

use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};

use crate::image::{ImageArtifact, ImageMetadata, ImageSize};
use crate::provider::ProviderKind;

/// Plain owned state composed by each provider variant.
///
/// Holds one artifact slot per [`ImageSize`] and exactly one metadata value.
/// Slots are independently locked so fetches for different sizes never
/// contend.
#[derive(Debug)]
pub struct ImageRecord {
    provider: ProviderKind,
    id: String,
    artifacts: [ImageArtifact; 6],
    metadata: RwLock<ImageMetadata>,
    info_complete: AtomicBool,
    /// Serializes `fetch_info` on this record.
    info_lock: Mutex<()>,
}

impl ImageRecord {
    /// Create a record from a per-size URL resolver.
    ///
    /// `url_for` is called once for every size; `None` leaves that slot
    /// without a source URL.
    pub fn new<F>(provider: ProviderKind, id: impl Into<String>, mut url_for: F) -> Self
    where
        F: FnMut(ImageSize) -> Option<String>,
    {
        let artifacts = ImageSize::ALL.map(|size| match url_for(size) {
            Some(url) => ImageArtifact::with_url(url),
            None => ImageArtifact::unavailable(),
        });

        Self {
            provider,
            id: id.into(),
            artifacts,
            metadata: RwLock::new(ImageMetadata::default()),
            info_complete: AtomicBool::new(false),
            info_lock: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn artifact(&self, size: ImageSize) -> &ImageArtifact {
        &self.artifacts[size.index()]
    }

    pub fn data(&self, size: ImageSize) -> Option<Bytes> {
        self.artifact(size).payload()
    }

    /// Snapshot of the current metadata.
    pub fn metadata(&self) -> ImageMetadata {
        self.metadata.read().clone()
    }

    /// Whether metadata has been fully loaded (from network or cache).
    pub fn is_info_complete(&self) -> bool {
        self.info_complete.load(Ordering::Acquire)
    }

    /// Replace metadata and mark it complete.
    pub(crate) fn complete_info(&self, metadata: ImageMetadata) {
        *self.metadata.write() = metadata;
        self.info_complete.store(true, Ordering::Release);
    }

    pub(crate) async fn lock_info(&self) -> MutexGuard<'_, ()> {
        self.info_lock.lock().await
    }
}
