//! Common types and utilities shared across CLI commands.

use std::collections::HashMap;
use std::sync::Arc;

use photostream::cache::ImageCacheClient;
use photostream::config::ConfigFile;
use photostream::geocode::OpenCageGeocoder;
use photostream::provider::{AsyncReqwestClient, FetchContext, ImageFactory, ProviderKind};
use tracing::info;

use crate::error::CliError;

/// Build the shared image factory from the loaded config.
pub async fn build_factory(config: &ConfigFile) -> Result<ImageFactory<AsyncReqwestClient>, CliError> {
    let http_client = AsyncReqwestClient::with_timeout(config.network.timeout_secs)?;
    let cache = ImageCacheClient::new(config.cache_config().build().await?);

    let mut context = FetchContext::new(http_client.clone(), cache, config.credentials());
    match &config.geocode.opencage_key {
        Some(key) => {
            context = context.with_geocoder(Arc::new(OpenCageGeocoder::new(http_client, key.clone())));
        }
        None => info!("No OpenCage key configured, coordinate-only locations stay empty"),
    }

    Ok(ImageFactory::new(context))
}

/// Fail early when the provider's credential is missing.
pub fn require_credentials(config: &ConfigFile, provider: ProviderKind) -> Result<(), CliError> {
    let missing = match provider {
        ProviderKind::Flickr => config.flickr.api_key.is_none(),
        ProviderKind::Unsplash => config.unsplash.access_key.is_none(),
    };
    if !missing {
        return Ok(());
    }

    let setting = match provider {
        ProviderKind::Flickr => "api_key in [flickr]",
        ProviderKind::Unsplash => "access_key in [unsplash]",
    };
    Err(CliError::Config(format!(
        "{} requires credentials. Set {} in config.ini",
        provider, setting
    )))
}

/// Parse a `KEY=URL` argument.
pub fn parse_url_pair(s: &str) -> Result<(String, String), String> {
    let (key, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=URL, got '{}'", s))?;
    if key.is_empty() || url.is_empty() {
        return Err(format!("expected KEY=URL, got '{}'", s));
    }
    Ok((key.to_string(), url.to_string()))
}

/// Collect `KEY=URL` pairs into an Unsplash `urls` map.
pub fn url_map(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    pairs.into_iter().collect()
}
