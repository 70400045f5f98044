//! The polymorphic image resource contract.

use std::future::Future;

use bytes::Bytes;

use crate::image::{ImageMetadata, ImageRecord, ImageSize};
use crate::provider::{ProviderError, ProviderKind};

/// Capability set every provider's image type implements.
///
/// Both fetch operations are cache-first and complete with `Ok(())`: the
/// loaded data is read afterwards through [`data`](Self::data) and
/// [`metadata`](Self::metadata). Repeated calls after a successful load never
/// touch the network.
pub trait ImageResource: Send + Sync {
    /// Provider-independent state of this image.
    fn record(&self) -> &ImageRecord;

    /// Source URL for a size variant.
    ///
    /// Fails with [`ProviderError::SizeUnavailable`] when the provider never
    /// supplied one.
    fn image_url(&self, size: ImageSize) -> Result<String, ProviderError>;

    /// Load the bytes of one size variant.
    ///
    /// Calls for different sizes of the same image may run concurrently.
    fn fetch_data(&self, size: ImageSize)
        -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Load and normalize descriptive metadata.
    ///
    /// Concurrent calls on the same image are serialized.
    fn fetch_info(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn provider(&self) -> ProviderKind {
        self.record().provider()
    }

    fn id(&self) -> &str {
        self.record().id()
    }

    /// Loaded bytes for a size variant, if fetched.
    fn data(&self, size: ImageSize) -> Option<Bytes> {
        self.record().data(size)
    }

    /// Snapshot of the current metadata.
    fn metadata(&self) -> ImageMetadata {
        self.record().metadata()
    }
}
