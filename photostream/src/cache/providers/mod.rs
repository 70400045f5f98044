//! Cache provider implementations.
//!
//! Each provider implements the `Cache` trait.
//!
//! # Available Providers
//!
//! - [`MemoryCacheProvider`]: In-memory LRU cache using moka
//! - [`DiskCacheProvider`]: One file per key under a cache directory
//! - [`TieredCache`]: Memory in front of disk

mod disk;
mod memory;
mod tiered;

pub use disk::DiskCacheProvider;
pub use memory::MemoryCacheProvider;
pub use tiered::TieredCache;
