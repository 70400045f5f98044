//! Two-level cache: memory in front of disk.

use std::sync::Arc;

use tracing::warn;

use crate::cache::traits::{BoxFuture, Cache, CacheError};

/// Cache that reads through a fast tier into a durable tier.
///
/// - `get`: fast tier first; a durable-tier hit is promoted into the fast tier
/// - `set`: written to both tiers; only a durable-tier failure is an error
/// - `delete`: removed from both tiers
pub struct TieredCache {
    fast: Arc<dyn Cache>,
    durable: Arc<dyn Cache>,
}

impl TieredCache {
    pub fn new(fast: Arc<dyn Cache>, durable: Arc<dyn Cache>) -> Self {
        Self { fast, durable }
    }
}

impl Cache for TieredCache {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if let Err(e) = self.fast.set(&key, value.clone()).await {
                warn!(error = %e, key = %key, "Fast tier set failed");
            }
            self.durable.set(&key, value).await
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            match self.fast.get(&key).await {
                Ok(Some(data)) => return Ok(Some(data)),
                Ok(None) => {}
                Err(e) => warn!(error = %e, key = %key, "Fast tier get failed"),
            }

            let data = self.durable.get(&key).await?;
            if let Some(ref data) = data {
                if let Err(e) = self.fast.set(&key, data.clone()).await {
                    warn!(error = %e, key = %key, "Fast tier promotion failed");
                }
            }
            Ok(data)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            let in_fast = self.fast.delete(&key).await.unwrap_or(false);
            let in_durable = self.durable.delete(&key).await?;
            Ok(in_fast || in_durable)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if self.fast.contains(&key).await.unwrap_or(false) {
                return Ok(true);
            }
            self.durable.contains(&key).await
        })
    }

    fn size_bytes(&self) -> u64 {
        self.durable.size_bytes()
    }

    fn entry_count(&self) -> u64 {
        self.durable.entry_count()
    }

    fn max_size_bytes(&self) -> u64 {
        self.durable.max_size_bytes()
    }
}
