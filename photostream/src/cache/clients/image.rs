//! Image cache client: the cache gate in front of every fetch.
//!
//! This client wraps a generic `Cache` with:
//! - Key translation: `(provider, id, kind, size)` → string key
//! - Metadata (de)serialization
//! - Hit/miss counters
//!
//! # Key Format
//!
//! - Image data: `{provider}:{id}:data:{size}` (e.g. `flickr:5231:data:medium`)
//! - Metadata: `{provider}:{id}:info` (e.g. `unsplash:Dwu85P9SOIk:info`)
//!
//! Store failures are logged and treated as misses so a broken cache never
//! fails a fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::traits::Cache;
use crate::image::{ImageMetadata, ImageSize};
use crate::provider::ProviderKind;

/// Point-in-time copy of the client's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Cache client for image artifacts and metadata.
pub struct ImageCacheClient {
    cache: Arc<dyn Cache>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImageCacheClient {
    /// Create a new image cache client.
    ///
    /// # Arguments
    ///
    /// * `cache` - The underlying cache implementation
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get image bytes for one size variant.
    ///
    /// # Returns
    ///
    /// `Some(data)` if cached, `None` otherwise
    pub async fn get_data(
        &self,
        provider: ProviderKind,
        id: &str,
        size: ImageSize,
    ) -> Option<Vec<u8>> {
        let key = Self::data_key(provider, id, size);
        self.lookup(&key).await
    }

    /// Store image bytes for one size variant.
    pub async fn set_data(&self, provider: ProviderKind, id: &str, size: ImageSize, data: Vec<u8>) {
        let key = Self::data_key(provider, id, size);
        self.store(&key, data).await;
    }

    /// Get cached metadata.
    ///
    /// An entry that no longer decodes is logged and reported as a miss.
    pub async fn get_info(&self, provider: ProviderKind, id: &str) -> Option<ImageMetadata> {
        let key = Self::info_key(provider, id);
        let bytes = self.lookup(&key).await?;
        match ImageMetadata::from_bytes(&bytes) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(error = %e, key = %key, "Discarding undecodable cached metadata");
                None
            }
        }
    }

    /// Store metadata.
    pub async fn set_info(&self, provider: ProviderKind, id: &str, metadata: &ImageMetadata) {
        let key = Self::info_key(provider, id);
        match metadata.to_bytes() {
            Ok(bytes) => self.store(&key, bytes).await,
            Err(e) => warn!(error = %e, key = %key, "Failed to encode metadata"),
        }
    }

    /// Remove every cached entry for an image.
    ///
    /// Returns how many entries were removed.
    pub async fn evict(&self, provider: ProviderKind, id: &str) -> usize {
        let keys = ImageSize::ALL
            .iter()
            .map(|size| Self::data_key(provider, id, *size))
            .chain(std::iter::once(Self::info_key(provider, id)));

        let mut removed = 0;
        for key in keys {
            match self.cache.delete(&key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, key = %key, "Image cache delete failed"),
            }
        }
        debug!(provider = %provider, id, removed, "Evicted image");
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Key for image bytes of one size variant.
    pub fn data_key(provider: ProviderKind, id: &str, size: ImageSize) -> String {
        format!("{}:{}:data:{}", provider, id, size)
    }

    /// Key for metadata.
    pub fn info_key(provider: ProviderKind, id: &str) -> String {
        format!("{}:{}:info", provider, id)
    }

    async fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        match self.cache.get(key).await {
            Ok(Some(data)) => {
                debug!(key = %key, "Cache hit");
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(data)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Image cache get failed");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn store(&self, key: &str, data: Vec<u8>) {
        if let Err(e) = self.cache.set(key, data).await {
            warn!(error = %e, key = %key, "Image cache set failed");
        }
    }
}
