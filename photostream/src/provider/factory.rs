//! Construction of provider images from listing entries.

use std::sync::Arc;

use crate::image::{ImageRecord, ImageResource, ImageSize};
use crate::provider::context::FetchContext;
use crate::provider::flickr::{FlickrImage, FlickrPhotoRef};
use crate::provider::http::AsyncHttpClient;
use crate::provider::types::ProviderError;
use crate::provider::unsplash::{UnsplashImage, UnsplashPhotoRef};

/// An image from any supported provider.
pub enum ProviderImage<C: AsyncHttpClient> {
    Flickr(FlickrImage<C>),
    Unsplash(UnsplashImage<C>),
}

impl<C: AsyncHttpClient> ImageResource for ProviderImage<C> {
    fn record(&self) -> &ImageRecord {
        match self {
            Self::Flickr(image) => image.record(),
            Self::Unsplash(image) => image.record(),
        }
    }

    fn image_url(&self, size: ImageSize) -> Result<String, ProviderError> {
        match self {
            Self::Flickr(image) => image.image_url(size),
            Self::Unsplash(image) => image.image_url(size),
        }
    }

    async fn fetch_data(&self, size: ImageSize) -> Result<(), ProviderError> {
        match self {
            Self::Flickr(image) => image.fetch_data(size).await,
            Self::Unsplash(image) => image.fetch_data(size).await,
        }
    }

    async fn fetch_info(&self) -> Result<(), ProviderError> {
        match self {
            Self::Flickr(image) => image.fetch_info().await,
            Self::Unsplash(image) => image.fetch_info().await,
        }
    }
}

impl<C: AsyncHttpClient> From<FlickrImage<C>> for ProviderImage<C> {
    fn from(image: FlickrImage<C>) -> Self {
        Self::Flickr(image)
    }
}

impl<C: AsyncHttpClient> From<UnsplashImage<C>> for ProviderImage<C> {
    fn from(image: UnsplashImage<C>) -> Self {
        Self::Unsplash(image)
    }
}

/// Builds images sharing one [`FetchContext`].
pub struct ImageFactory<C: AsyncHttpClient> {
    context: Arc<FetchContext<C>>,
}

impl<C: AsyncHttpClient> ImageFactory<C> {
    pub fn new(context: FetchContext<C>) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &Arc<FetchContext<C>> {
        &self.context
    }

    pub fn flickr(&self, photo: FlickrPhotoRef) -> ProviderImage<C> {
        FlickrImage::from_ref(Arc::clone(&self.context), photo).into()
    }

    pub fn unsplash(&self, photo: UnsplashPhotoRef) -> ProviderImage<C> {
        UnsplashImage::from_ref(Arc::clone(&self.context), photo).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::cache::{ImageCacheClient, MemoryCacheProvider};
    use crate::provider::types::{ProviderCredentials, ProviderKind};
    use crate::provider::MockAsyncHttpClient;

    fn factory(response: &str) -> ImageFactory<MockAsyncHttpClient> {
        let cache = ImageCacheClient::new(Arc::new(MemoryCacheProvider::new(1_000_000, None)));
        ImageFactory::new(FetchContext::new(
            MockAsyncHttpClient::ok(response),
            cache,
            ProviderCredentials::default(),
        ))
    }

    #[test]
    fn test_factory_builds_both_providers() {
        let factory = factory("");
        let flickr = factory.flickr(FlickrPhotoRef {
            id: "1".to_string(),
            farm: 1,
            server: "2".to_string(),
            secret: "s".to_string(),
        });
        let unsplash = factory.unsplash(UnsplashPhotoRef {
            id: "u".to_string(),
            urls: HashMap::new(),
        });

        assert_eq!(flickr.provider(), ProviderKind::Flickr);
        assert_eq!(unsplash.provider(), ProviderKind::Unsplash);
        assert!(flickr.image_url(ImageSize::Thumbnail).is_ok());
        assert!(unsplash.image_url(ImageSize::Thumbnail).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_shares_cache() {
        let factory = factory(r#"{"description": "Pier"}"#);
        let first = factory.unsplash(UnsplashPhotoRef {
            id: "u".to_string(),
            urls: HashMap::new(),
        });
        let second = factory.unsplash(UnsplashPhotoRef {
            id: "u".to_string(),
            urls: HashMap::new(),
        });

        first.fetch_info().await.unwrap();
        second.fetch_info().await.unwrap();

        assert_eq!(second.metadata().title.as_deref(), Some("Pier"));
        assert_eq!(factory.context().http_client().request_count(), 1);
    }
}
