//! `photostream info`: fetch and print photo metadata.

use std::collections::HashMap;

use clap::Subcommand;
use photostream::config::ConfigFile;
use photostream::image::{ImageMetadata, ImageResource};
use photostream::provider::{FlickrPhotoRef, ProviderKind, UnsplashPhotoRef};

use super::common::{build_factory, require_credentials};
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum InfoTarget {
    /// Flickr photo by id
    Flickr { id: String },
    /// Unsplash photo by id
    Unsplash { id: String },
}

impl InfoTarget {
    fn provider(&self) -> ProviderKind {
        match self {
            InfoTarget::Flickr { .. } => ProviderKind::Flickr,
            InfoTarget::Unsplash { .. } => ProviderKind::Unsplash,
        }
    }
}

pub async fn run(config: &ConfigFile, target: InfoTarget) -> Result<(), CliError> {
    let provider = target.provider();
    require_credentials(config, provider)?;
    let factory = build_factory(config).await?;

    let image = match target {
        // Metadata lookups need only the id.
        InfoTarget::Flickr { id } => factory.flickr(FlickrPhotoRef {
            id,
            farm: 0,
            server: String::new(),
            secret: String::new(),
        }),
        InfoTarget::Unsplash { id } => factory.unsplash(UnsplashPhotoRef {
            id,
            urls: HashMap::new(),
        }),
    };

    image.fetch_info().await?;
    print!("{}", render(provider, image.id(), &image.metadata()));
    Ok(())
}

fn render(provider: ProviderKind, id: &str, metadata: &ImageMetadata) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "{}:{}\n  Title:       {}\n  Author:      {}\n  Date:        {}\n  Location:    {}\n  Description: {}\n",
        provider,
        id,
        field(&metadata.title),
        field(&metadata.author),
        field(&metadata.date),
        field(&metadata.location),
        field(&metadata.description),
    )
}
