//! Cache configuration and construction.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cache::providers::{DiskCacheProvider, MemoryCacheProvider, TieredCache};
use crate::cache::traits::{Cache, CacheError};
use crate::config::format_size;

/// Default memory cache size: 256 MB.
pub const DEFAULT_MEMORY_CACHE_SIZE: u64 = 256 * 1024 * 1024;

/// Default disk cache size: 2 GB.
pub const DEFAULT_DISK_CACHE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Maximum memory cache size in bytes.
    pub memory_size_bytes: u64,

    /// Disk tier, if persistence is wanted.
    pub disk: Option<DiskCacheConfig>,
}

/// Disk cache configuration.
#[derive(Clone, Debug)]
pub struct DiskCacheConfig {
    /// Root directory for the disk cache.
    pub directory: PathBuf,

    /// Maximum total size in bytes.
    pub max_size_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_size_bytes: DEFAULT_MEMORY_CACHE_SIZE,
            disk: None,
        }
    }
}

impl CacheConfig {
    /// Memory-only cache.
    pub fn memory(size_bytes: u64) -> Self {
        Self {
            memory_size_bytes: size_bytes,
            disk: None,
        }
    }

    /// Add a disk tier.
    pub fn with_disk(mut self, directory: PathBuf, max_size_bytes: u64) -> Self {
        self.disk = Some(DiskCacheConfig {
            directory,
            max_size_bytes,
        });
        self
    }

    /// Build the configured cache.
    pub async fn build(&self) -> Result<Arc<dyn Cache>, CacheError> {
        let memory: Arc<dyn Cache> = Arc::new(MemoryCacheProvider::new(self.memory_size_bytes, None));

        let Some(disk) = &self.disk else {
            info!(memory = %format_size(self.memory_size_bytes), "Using memory cache");
            return Ok(memory);
        };

        let durable = DiskCacheProvider::open(&disk.directory, disk.max_size_bytes).await?;
        info!(
            memory = %format_size(self.memory_size_bytes),
            disk = %format_size(disk.max_size_bytes),
            directory = %disk.directory.display(),
            "Using memory + disk cache"
        );
        Ok(Arc::new(TieredCache::new(memory, Arc::new(durable))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_memory_only() {
        let config = CacheConfig::default();
        assert_eq!(config.memory_size_bytes, DEFAULT_MEMORY_CACHE_SIZE);
        assert!(config.disk.is_none());
    }

    #[tokio::test]
    async fn test_build_memory() {
        let cache = CacheConfig::memory(1024).build().await.unwrap();
        assert_eq!(cache.max_size_bytes(), 1024);
    }

    #[tokio::test]
    async fn test_build_with_disk_persists() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig::memory(1024).with_disk(dir.path().to_path_buf(), 4096);

        let cache = config.build().await.unwrap();
        cache.set("k", vec![1, 2, 3]).await.unwrap();

        let reopened = config.build().await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(reopened.max_size_bytes(), 4096);
    }
}
