//! Image provider adapters.
//!
//! This module provides the Flickr and Unsplash implementations of
//! [`ImageResource`](crate::image::ImageResource), the HTTP transport they
//! share, and the cache-first [`FetchContext`] pipeline.
//!
//! # Factory Pattern
//!
//! For building images from listing entries, use the [`ImageFactory`]:
//!
//! ```ignore
//! use photostream::provider::{AsyncReqwestClient, FetchContext, ImageFactory};
//!
//! let context = FetchContext::new(AsyncReqwestClient::new()?, cache, credentials);
//! let factory = ImageFactory::new(context);
//! let image = factory.unsplash(photo_ref);
//! image.fetch_info().await?;
//! ```

mod context;
mod factory;
pub mod flickr;
mod http;
mod types;
pub mod unsplash;

pub use context::FetchContext;
pub use factory::{ImageFactory, ProviderImage};
pub use flickr::{FlickrImage, FlickrPhotoRef};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{Coordinates, NormalizedInfo, ProviderCredentials, ProviderError, ProviderKind};
pub use unsplash::{UnsplashImage, UnsplashPhotoRef};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};
