//! End-to-end fetch pipeline tests against the public API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use photostream::cache::{BoxFuture, CacheConfig, ImageCacheClient};
use photostream::geocode::{GeocodeError, ReverseGeocoder};
use photostream::image::{ImageResource, ImageSize};
use photostream::provider::{
    AsyncHttpClient, FetchContext, FlickrPhotoRef, ImageFactory, ProviderCredentials,
    ProviderError, ProviderKind, UnsplashPhotoRef,
};
use tempfile::TempDir;

/// Serves canned bodies keyed by URL prefix.
#[derive(Default)]
struct RoutedHttpClient {
    routes: Vec<(String, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
}

impl RoutedHttpClient {
    fn route(mut self, prefix: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.push((prefix.to_string(), body.into()));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl AsyncHttpClient for RoutedHttpClient {
    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().push(url.to_string());
        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| ProviderError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

struct CountingGeocoder {
    place: Option<&'static str>,
    calls: AtomicUsize,
}

impl ReverseGeocoder for CountingGeocoder {
    fn reverse_geocode<'a>(
        &'a self,
        latitude: &'a str,
        longitude: &'a str,
    ) -> BoxFuture<'a, Result<String, GeocodeError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.place.map(str::to_string).ok_or(GeocodeError::NoResults {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
            })
        })
    }
}

fn credentials() -> ProviderCredentials {
    ProviderCredentials {
        flickr_api_key: "fk".to_string(),
        unsplash_access_key: "uk".to_string(),
    }
}

async fn factory(
    http: RoutedHttpClient,
    cache: &CacheConfig,
    geocoder: Arc<CountingGeocoder>,
) -> ImageFactory<RoutedHttpClient> {
    let cache = ImageCacheClient::new(cache.build().await.unwrap());
    ImageFactory::new(FetchContext::new(http, cache, credentials()).with_geocoder(geocoder))
}

fn flickr_ref() -> FlickrPhotoRef {
    FlickrPhotoRef {
        id: "52345".to_string(),
        farm: 66,
        server: "65535".to_string(),
        secret: "abc123".to_string(),
    }
}

fn unsplash_ref() -> UnsplashPhotoRef {
    let urls = [
        ("thumb", "https://images.unsplash.com/p?w=200"),
        ("small", "https://images.unsplash.com/p?w=400"),
        ("regular", "https://images.unsplash.com/p?w=1080"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<HashMap<_, _>>();
    UnsplashPhotoRef {
        id: "Dwu85P9SOIk".to_string(),
        urls,
    }
}

const FLICKR_INFO: &str = r#"jsonFlickrApi({"photo": {
    "title": {"_content": "Harbour"},
    "owner": {"username": "sailor", "realname": "Jo Sailor"},
    "dates": {"taken": "2019-04-01 09:30:00"},
    "description": {"_content": "Morning fog"},
    "location": {"latitude": "59.91", "longitude": "10.75"}
}, "stat": "ok"})"#;

const UNSPLASH_INFO: &str = r#"{
    "id": "Dwu85P9SOIk",
    "description": null,
    "created_at": "2020-06-17T10:00:00Z",
    "user": {"name": "Ana Lima", "username": "analima"},
    "location": {"title": "Lisbon, Portugal", "position": {"latitude": 38.7, "longitude": -9.1}}
}"#;

#[tokio::test]
async fn test_flickr_info_is_enriched_and_cached() {
    let geocoder = Arc::new(CountingGeocoder {
        place: Some("Oslo, Norway"),
        calls: AtomicUsize::new(0),
    });
    let http = RoutedHttpClient::default().route("https://api.flickr.com/", FLICKR_INFO);
    let factory = factory(http, &CacheConfig::memory(1_000_000), geocoder.clone()).await;

    let first = factory.flickr(flickr_ref());
    first.fetch_info().await.unwrap();

    let metadata = first.metadata();
    assert_eq!(metadata.title.as_deref(), Some("Harbour"));
    assert_eq!(metadata.author.as_deref(), Some("Jo Sailor"));
    assert_eq!(metadata.location.as_deref(), Some("Oslo, Norway"));

    // A fresh resource for the same photo is served from cache.
    let second = factory.flickr(flickr_ref());
    second.fetch_info().await.unwrap();

    assert_eq!(second.metadata(), metadata);
    assert_eq!(factory.context().http_client().requests().len(), 1);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unsplash_location_title_skips_geocoder() {
    let geocoder = Arc::new(CountingGeocoder {
        place: Some("unused"),
        calls: AtomicUsize::new(0),
    });
    let http = RoutedHttpClient::default().route("https://api.unsplash.com/photos/", UNSPLASH_INFO);
    let factory = factory(http, &CacheConfig::memory(1_000_000), geocoder.clone()).await;

    let image = factory.unsplash(unsplash_ref());
    image.fetch_info().await.unwrap();

    let metadata = image.metadata();
    assert_eq!(metadata.title.as_deref(), Some("Untitled"));
    assert_eq!(metadata.author.as_deref(), Some("Ana Lima"));
    assert_eq!(metadata.location.as_deref(), Some("Lisbon, Portugal"));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_sizes_then_cache_hits() {
    let geocoder = Arc::new(CountingGeocoder {
        place: None,
        calls: AtomicUsize::new(0),
    });
    let http = RoutedHttpClient::default()
        .route("https://images.unsplash.com/p?w=200", b"thumb".to_vec())
        .route("https://images.unsplash.com/p?w=400", b"small".to_vec())
        .route("https://images.unsplash.com/p?w=1080", b"regular".to_vec());
    let factory = factory(http, &CacheConfig::memory(1_000_000), geocoder).await;
    let image = factory.unsplash(unsplash_ref());

    let (a, b, c) = tokio::join!(
        image.fetch_data(ImageSize::Thumbnail),
        image.fetch_data(ImageSize::Small),
        image.fetch_data(ImageSize::Medium),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(image.data(ImageSize::Thumbnail).unwrap().as_ref(), b"thumb");
    assert_eq!(image.data(ImageSize::Small).unwrap().as_ref(), b"small");
    assert_eq!(image.data(ImageSize::Medium).unwrap().as_ref(), b"regular");

    let again = factory.unsplash(unsplash_ref());
    again.fetch_data(ImageSize::Small).await.unwrap();
    assert_eq!(again.data(ImageSize::Small).unwrap().as_ref(), b"small");
    assert_eq!(factory.context().http_client().requests().len(), 3);

    let stats = factory.context().cache().stats();
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_unavailable_size_and_missing_route() {
    let geocoder = Arc::new(CountingGeocoder {
        place: None,
        calls: AtomicUsize::new(0),
    });
    let factory = factory(
        RoutedHttpClient::default(),
        &CacheConfig::memory(1_000_000),
        geocoder,
    )
    .await;
    let image = factory.unsplash(unsplash_ref());

    assert_eq!(
        image.fetch_data(ImageSize::Original).await,
        Err(ProviderError::SizeUnavailable(ImageSize::Original))
    );
    assert!(matches!(
        image.fetch_data(ImageSize::Small).await,
        Err(ProviderError::HttpStatus { status: 404, .. })
    ));
    assert!(image.data(ImageSize::Small).is_none());
    assert_eq!(image.provider(), ProviderKind::Unsplash);
}

#[tokio::test]
async fn test_disk_tier_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::memory(1_000_000).with_disk(dir.path().to_path_buf(), 10_000_000);
    let geocoder = Arc::new(CountingGeocoder {
        place: None,
        calls: AtomicUsize::new(0),
    });

    let http = RoutedHttpClient::default().route("https://farm66.staticflickr.com/", vec![0xFF, 0xD8]);
    let first = factory(http, &config, geocoder.clone()).await;
    first
        .flickr(flickr_ref())
        .fetch_data(ImageSize::Large)
        .await
        .unwrap();

    // No routes: any network call would fail.
    let second = factory(RoutedHttpClient::default(), &config, geocoder).await;
    let image = second.flickr(flickr_ref());
    image.fetch_data(ImageSize::Large).await.unwrap();

    assert_eq!(image.data(ImageSize::Large).unwrap().as_ref(), &[0xFF, 0xD8]);
    assert!(second.context().http_client().requests().is_empty());
}

#[tokio::test]
async fn test_all_flickr_sizes_concurrently() {
    let geocoder = Arc::new(CountingGeocoder {
        place: None,
        calls: AtomicUsize::new(0),
    });
    let http = RoutedHttpClient::default().route("https://farm66.staticflickr.com/", vec![7u8; 16]);
    let factory = factory(http, &CacheConfig::memory(1_000_000), geocoder).await;
    let image = factory.flickr(flickr_ref());

    let results = futures::future::join_all(ImageSize::ALL.map(|size| image.fetch_data(size))).await;

    assert!(results.iter().all(Result::is_ok));
    for size in ImageSize::ALL {
        assert_eq!(image.data(size).unwrap().len(), 16);
    }

    let mut requested = factory.context().http_client().requests();
    requested.sort();
    requested.dedup();
    assert_eq!(requested.len(), ImageSize::ALL.len());
}
