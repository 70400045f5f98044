//! `photostream evict`: drop every cached entry for one photo.

use photostream::cache::ImageCacheClient;
use photostream::config::ConfigFile;
use photostream::provider::ProviderKind;

use crate::error::CliError;

pub async fn run(config: &ConfigFile, provider: ProviderKind, id: &str) -> Result<(), CliError> {
    let cache = ImageCacheClient::new(config.cache_config().build().await?);
    let removed = cache.evict(provider, id).await;
    println!("Removed {} cached entries for {}:{}", removed, provider, id);
    Ok(())
}
