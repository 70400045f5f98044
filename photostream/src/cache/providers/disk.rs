//! On-disk cache provider.
//!
//! Each key is stored in its own file. File names are the SHA-256 of the key,
//! fanned out into 256 subdirectories by the first hex byte:
//!
//! ```text
//! {root}/3f/3fa9...e1
//! ```
//!
//! Writes go to a temporary sibling and are renamed into place, so a reader
//! never observes a partially written entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::traits::{BoxFuture, Cache, CacheError};

/// Cache provider persisting entries under a directory.
///
/// Size and entry counters are seeded by scanning the directory on
/// [`open`](Self::open) and kept current on every write and delete. Entries
/// are never evicted; once the configured maximum is reached further writes
/// of new data fail with [`CacheError::CapacityExceeded`].
///
/// Writes and deletes hold `write_lock` from the length check through the
/// counter update, so concurrent writers of one key count it once.
pub struct DiskCacheProvider {
    root: PathBuf,
    max_size_bytes: u64,
    size_bytes: AtomicU64,
    entry_count: AtomicU64,
    write_lock: Mutex<()>,
    tmp_seq: AtomicU64,
}

impl DiskCacheProvider {
    /// Open (creating if needed) a disk cache rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>, max_size_bytes: u64) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        let (entries, bytes) = scan(&root).await?;
        debug!(root = %root.display(), entries, bytes, "Opened disk cache");

        Ok(Self {
            root,
            max_size_bytes,
            size_bytes: AtomicU64::new(bytes),
            entry_count: AtomicU64::new(entries),
            write_lock: Mutex::new(()),
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.root.join(&hex[..2]).join(hex)
    }

    async fn existing_len(path: &Path) -> Result<Option<u64>, CacheError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

async fn scan(root: &Path) -> Result<(u64, u64), CacheError> {
    let mut entries = 0u64;
    let mut bytes = 0u64;

    let mut shards = fs::read_dir(root).await?;
    while let Some(shard) = shards.next_entry().await? {
        if !shard.file_type().await?.is_dir() {
            continue;
        }
        let mut files = fs::read_dir(shard.path()).await?;
        while let Some(file) = files.next_entry().await? {
            let meta = file.metadata().await?;
            if meta.is_file() && !is_temp(&file.path()) {
                entries += 1;
                bytes += meta.len();
            }
        }
    }

    Ok((entries, bytes))
}

async fn write_then_rename(tmp: &Path, path: &Path, value: &[u8]) -> Result<(), CacheError> {
    fs::write(tmp, value).await?;
    fs::rename(tmp, path).await?;
    Ok(())
}

fn is_temp(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tmp")
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            let size = value.len();
            if size as u64 > self.max_size_bytes {
                return Err(CacheError::ValueTooLarge {
                    size,
                    max: self.max_size_bytes as usize,
                });
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            let _guard = self.write_lock.lock().await;
            let previous = Self::existing_len(&path).await?;
            let used = self.size_bytes.load(Ordering::Relaxed);
            let projected = used.saturating_sub(previous.unwrap_or(0)) + size as u64;
            if projected > self.max_size_bytes {
                return Err(CacheError::CapacityExceeded {
                    used,
                    max: self.max_size_bytes,
                });
            }

            let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
            let tmp = path.with_extension(format!("{}.tmp", seq));
            if let Err(e) = write_then_rename(&tmp, &path, &value).await {
                let _ = fs::remove_file(&tmp).await;
                return Err(e);
            }

            match previous {
                Some(old) => {
                    self.size_bytes.fetch_sub(old, Ordering::Relaxed);
                }
                None => {
                    self.entry_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            self.size_bytes.fetch_add(size as u64, Ordering::Relaxed);
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            let Some(len) = Self::existing_len(&path).await? else {
                return Ok(false);
            };
            match fs::remove_file(&path).await {
                Ok(()) => {
                    self.size_bytes.fetch_sub(len, Ordering::Relaxed);
                    self.entry_count.fetch_sub(1, Ordering::Relaxed);
                    Ok(true)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.path_for(key);
        Box::pin(async move { Ok(Self::existing_len(&path).await?.is_some()) })
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.entry_count.load(Ordering::Relaxed)
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}
