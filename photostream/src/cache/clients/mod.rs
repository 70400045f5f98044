//! Domain-specific cache clients.
//!
//! These clients wrap the generic `Cache` trait with domain-specific
//! key translation.
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │        ImageCacheClient         │
//! │                                 │
//! │ (provider, id, size) → key      │
//! │ ImageMetadata ↔ JSON            │
//! └────────────────┬────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────┐
//! │         Arc<dyn Cache>          │
//! │  Generic key-value store        │
//! └─────────────────────────────────┘
//! ```

mod image;

pub use image::{CacheStats, ImageCacheClient};
