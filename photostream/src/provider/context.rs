//! Shared services and the cache-first fetch pipeline.
//!
//! Every provider variant delegates to the same two routines:
//!
//! ```text
//! load_data:  slot loaded? ─► cache hit? ─► resolve URL ─► GET ─► slot + write-through
//! load_info:  complete?    ─► cache hit? ─► GET ─► normalize ─► geocode? ─► write-through
//! ```
//!
//! Only the URL, headers and normalizer differ between providers.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::ImageCacheClient;
use crate::geocode::ReverseGeocoder;
use crate::image::{ImageRecord, ImageSize};
use crate::provider::http::AsyncHttpClient;
use crate::provider::types::{NormalizedInfo, ProviderCredentials, ProviderError};

/// Services shared by all image resources.
///
/// Resources keep an `Arc` to the context; the context never refers back to
/// a resource.
pub struct FetchContext<C: AsyncHttpClient> {
    http_client: C,
    cache: ImageCacheClient,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    credentials: ProviderCredentials,
}

impl<C: AsyncHttpClient> FetchContext<C> {
    /// Creates a context without a geocoder.
    ///
    /// Coordinate-only locations are then left unset.
    pub fn new(http_client: C, cache: ImageCacheClient, credentials: ProviderCredentials) -> Self {
        Self {
            http_client,
            cache,
            geocoder: None,
            credentials,
        }
    }

    /// Attach a reverse geocoder for location enrichment.
    pub fn with_geocoder(mut self, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    pub fn cache(&self) -> &ImageCacheClient {
        &self.cache
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    /// Cache-first load of one size variant into `record`.
    ///
    /// `resolve` is only called on a cache miss.
    pub(crate) async fn load_data<F>(
        &self,
        record: &ImageRecord,
        size: ImageSize,
        headers: &[(&str, &str)],
        resolve: F,
    ) -> Result<(), ProviderError>
    where
        F: FnOnce() -> Result<String, ProviderError>,
    {
        let artifact = record.artifact(size);
        if artifact.is_loaded() {
            debug!(provider = %record.provider(), id = record.id(), %size, "Image data already loaded");
            return Ok(());
        }

        if let Some(data) = self
            .cache
            .get_data(record.provider(), record.id(), size)
            .await
        {
            artifact.store(Bytes::from(data));
            return Ok(());
        }

        let url = resolve()?;
        let data = self.http_client.get(&url, headers).await?;
        debug!(provider = %record.provider(), id = record.id(), %size, bytes = data.len(), "Fetched image data");

        self.cache
            .set_data(record.provider(), record.id(), size, data.clone())
            .await;
        artifact.store(Bytes::from(data));
        Ok(())
    }

    /// Cache-first load of metadata into `record`.
    ///
    /// Serialized per record. The metadata is written through exactly once,
    /// after geocoding (if any) has finished, whether or not it succeeded.
    pub(crate) async fn load_info<F>(
        &self,
        record: &ImageRecord,
        url: &str,
        headers: &[(&str, &str)],
        parse: F,
    ) -> Result<(), ProviderError>
    where
        F: FnOnce(&[u8]) -> Result<NormalizedInfo, ProviderError>,
    {
        let _guard = record.lock_info().await;
        if record.is_info_complete() {
            debug!(provider = %record.provider(), id = record.id(), "Metadata already loaded");
            return Ok(());
        }

        if let Some(metadata) = self.cache.get_info(record.provider(), record.id()).await {
            record.complete_info(metadata);
            return Ok(());
        }

        let body = self.http_client.get(url, headers).await?;
        let NormalizedInfo {
            mut metadata,
            pending_location,
        } = parse(&body)?;

        if let Some(coords) = pending_location {
            match &self.geocoder {
                Some(geocoder) => {
                    match geocoder
                        .reverse_geocode(&coords.latitude, &coords.longitude)
                        .await
                    {
                        Ok(place) => metadata.location = Some(place),
                        Err(e) => warn!(
                            provider = %record.provider(),
                            id = record.id(),
                            error = %e,
                            "Reverse geocoding failed, continuing without location"
                        ),
                    }
                }
                None => debug!(
                    provider = %record.provider(),
                    id = record.id(),
                    "No geocoder configured, skipping location"
                ),
            }
        }

        self.cache
            .set_info(record.provider(), record.id(), &metadata)
            .await;
        record.complete_info(metadata);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::{BoxFuture, Cache, CacheError, MemoryCacheProvider};
    use crate::geocode::tests::MockGeocoder;
    use crate::image::ImageMetadata;
    use crate::provider::types::{Coordinates, ProviderKind};
    use crate::provider::MockAsyncHttpClient;

    /// Memory cache that counts metadata writes.
    struct CountingCache {
        inner: MemoryCacheProvider,
        info_writes: AtomicUsize,
    }

    impl CountingCache {
        fn new() -> Self {
            Self {
                inner: MemoryCacheProvider::new(1_000_000, None),
                info_writes: AtomicUsize::new(0),
            }
        }

        fn info_writes(&self) -> usize {
            self.info_writes.load(Ordering::SeqCst)
        }
    }

    impl Cache for CountingCache {
        fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
            if key.ends_with(":info") {
                self.info_writes.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.set(key, value)
        }

        fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
            self.inner.get(key)
        }

        fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
            self.inner.delete(key)
        }

        fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
            self.inner.contains(key)
        }

        fn size_bytes(&self) -> u64 {
            self.inner.size_bytes()
        }

        fn entry_count(&self) -> u64 {
            self.inner.entry_count()
        }

        fn max_size_bytes(&self) -> u64 {
            self.inner.max_size_bytes()
        }
    }

    fn context(
        cache: Arc<CountingCache>,
        geocoder: Option<Arc<MockGeocoder>>,
    ) -> FetchContext<MockAsyncHttpClient> {
        let context = FetchContext::new(
            MockAsyncHttpClient::ok("{}"),
            ImageCacheClient::new(cache),
            ProviderCredentials::default(),
        );
        match geocoder {
            Some(geocoder) => context.with_geocoder(geocoder),
            None => context,
        }
    }

    fn record() -> ImageRecord {
        ImageRecord::new(ProviderKind::Unsplash, "abc", |_| None)
    }

    fn info(pending_location: Option<Coordinates>) -> NormalizedInfo {
        NormalizedInfo {
            metadata: ImageMetadata {
                title: Some("Pier".to_string()),
                ..Default::default()
            },
            pending_location,
        }
    }

    async fn info_writes_for(
        geocoder: Option<Arc<MockGeocoder>>,
        pending_location: Option<Coordinates>,
    ) -> (usize, ImageMetadata) {
        let cache = Arc::new(CountingCache::new());
        let ctx = context(cache.clone(), geocoder);
        let record = record();
        let normalized = info(pending_location);

        ctx.load_info(&record, "https://api.unsplash.com/photos/abc", &[], |_| Ok(normalized))
            .await
            .unwrap();
        // A second call is satisfied by the completion flag.
        ctx.load_info(&record, "https://api.unsplash.com/photos/abc", &[], |_| {
            Ok(info(None))
        })
        .await
        .unwrap();

        (cache.info_writes(), record.metadata())
    }

    #[tokio::test]
    async fn test_single_write_without_location() {
        let (writes, metadata) =
            info_writes_for(Some(Arc::new(MockGeocoder::ok("Lisbon"))), None).await;

        assert_eq!(writes, 1);
        assert!(metadata.location.is_none());
    }

    #[tokio::test]
    async fn test_single_write_after_geocode_success() {
        let (writes, metadata) = info_writes_for(
            Some(Arc::new(MockGeocoder::ok("Lisbon"))),
            Some(Coordinates::new("38.7", "-9.1")),
        )
        .await;

        assert_eq!(writes, 1);
        assert_eq!(metadata.location.as_deref(), Some("Lisbon"));
    }

    #[tokio::test]
    async fn test_single_write_after_geocode_failure() {
        let (writes, metadata) = info_writes_for(
            Some(Arc::new(MockGeocoder::failing())),
            Some(Coordinates::new("38.7", "-9.1")),
        )
        .await;

        assert_eq!(writes, 1);
        assert!(metadata.location.is_none());
        assert_eq!(metadata.title.as_deref(), Some("Pier"));
    }

    #[tokio::test]
    async fn test_single_write_without_geocoder() {
        let (writes, metadata) =
            info_writes_for(None, Some(Coordinates::new("38.7", "-9.1"))).await;

        assert_eq!(writes, 1);
        assert!(metadata.location.is_none());
    }

    #[tokio::test]
    async fn test_cached_info_is_not_written_again() {
        let cache = Arc::new(CountingCache::new());
        let first = record();
        context(cache.clone(), None)
            .load_info(&first, "u", &[], |_| Ok(info(None)))
            .await
            .unwrap();

        let second = record();
        context(cache.clone(), None)
            .load_info(&second, "u", &[], |_| Ok(info(None)))
            .await
            .unwrap();

        assert_eq!(cache.info_writes(), 1);
        assert_eq!(second.metadata().title.as_deref(), Some("Pier"));
    }
}
