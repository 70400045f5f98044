//! `photostream fetch`: download one size variant to a file.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use photostream::config::ConfigFile;
use photostream::image::{ImageResource, ImageSize};
use photostream::provider::{FlickrPhotoRef, ProviderError, ProviderKind, UnsplashPhotoRef};

use super::common::{build_factory, parse_url_pair, require_credentials, url_map};
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum FetchTarget {
    /// Flickr photo, located by its farm/server/secret triple
    Flickr {
        id: String,
        #[arg(long)]
        farm: u32,
        #[arg(long)]
        server: String,
        #[arg(long)]
        secret: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Unsplash photo, with the URLs from its listing entry
    Unsplash {
        id: String,
        /// Size URL as KEY=URL (thumb, small, regular, full, raw); repeatable
        #[arg(long = "url", value_name = "KEY=URL", value_parser = parse_url_pair, required = true)]
        urls: Vec<(String, String)>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Size variant (thumbnail, small, medium, large, extra-large, original)
    #[arg(long, default_value_t = ImageSize::Original)]
    size: ImageSize,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

pub async fn run(config: &ConfigFile, target: FetchTarget) -> Result<(), CliError> {
    let provider = match &target {
        FetchTarget::Flickr { .. } => ProviderKind::Flickr,
        FetchTarget::Unsplash { .. } => ProviderKind::Unsplash,
    };
    require_credentials(config, provider)?;
    let factory = build_factory(config).await?;

    let (image, output) = match target {
        FetchTarget::Flickr {
            id,
            farm,
            server,
            secret,
            output,
        } => (
            factory.flickr(FlickrPhotoRef {
                id,
                farm,
                server,
                secret,
            }),
            output,
        ),
        FetchTarget::Unsplash { id, urls, output } => (
            factory.unsplash(UnsplashPhotoRef {
                id,
                urls: url_map(urls),
            }),
            output,
        ),
    };

    image.fetch_data(output.size).await?;
    let data = image
        .data(output.size)
        .ok_or(ProviderError::SizeUnavailable(output.size))?;
    write_output(&output.output, &data)?;

    let stats = factory.context().cache().stats();
    println!(
        "Wrote {} bytes to {} (cache hits: {}, misses: {})",
        data.len(),
        output.output.display(),
        stats.hits,
        stats.misses
    );
    Ok(())
}

fn write_output(path: &Path, data: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })
}
