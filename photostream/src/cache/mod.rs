//! Cache service for image artifacts and metadata.
//!
//! - [`Cache`]: generic string-keyed byte store, implemented by the providers
//! - [`ImageCacheClient`]: image-aware gate consulted before every fetch
//! - [`CacheConfig`]: builds a memory or memory+disk cache

pub mod clients;
mod config;
pub mod providers;
mod traits;

pub use clients::{CacheStats, ImageCacheClient};
pub use config::{
    CacheConfig, DiskCacheConfig, DEFAULT_DISK_CACHE_SIZE, DEFAULT_MEMORY_CACHE_SIZE,
};
pub use providers::{DiskCacheProvider, MemoryCacheProvider, TieredCache};
pub use traits::{BoxFuture, Cache, CacheError};
