//! Core traits for the generic cache service.
//!
//! The `Cache` trait provides a domain-agnostic key-value interface for caching.
//! All cache providers implement this trait, allowing callers to use any backend
//! through a consistent interface.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging, flexible for any domain
//! - **Vec<u8> values**: Raw bytes, no serialization opinions imposed
//! - **Minimal interface**: Only essential operations, no domain-specific concerns
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use photostream::cache::{Cache, MemoryCacheProvider};
//!
//! let cache = MemoryCacheProvider::new(64 * 1024 * 1024, None);
//! cache.set("key", vec![1, 2, 3]).await?;
//! let value = cache.get("key").await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value exceeds maximum allowed size.
    #[error("Value too large: {size} bytes (max: {max})")]
    ValueTooLarge { size: usize, max: usize },

    /// The store is full.
    #[error("Cache full: {used} of {max} bytes used")]
    CapacityExceeded { used: u64, max: u64 },

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic cache interface for key-value storage.
///
/// Providers implement this trait to offer caching capabilities. The interface
/// is intentionally minimal and domain-agnostic; image concepts such as
/// provider, identifier and size are handled by
/// [`ImageCacheClient`](crate::cache::ImageCacheClient).
///
/// # Consistency
///
/// Writes to the same key are last-write-wins. No cross-key atomicity is
/// offered or required.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
pub trait Cache: Send + Sync {
    /// Store a value with the given key.
    ///
    /// If the key already exists, the value is replaced.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>>;

    /// Delete a value by key.
    ///
    /// Returns `Ok(true)` if the key existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// Current size of the cache in bytes.
    fn size_bytes(&self) -> u64;

    /// Current number of entries in the cache.
    fn entry_count(&self) -> u64;

    /// Maximum configured size in bytes.
    fn max_size_bytes(&self) -> u64;
}
