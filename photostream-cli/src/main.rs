//! Photostream CLI - Command-line interface
//!
//! Fetches Flickr and Unsplash photos and metadata through the cache-first
//! photostream library.

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use photostream::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use photostream::logging;
use photostream::provider::ProviderKind;

use commands::fetch::FetchTarget;
use commands::info::InfoTarget;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "photostream", version, about = "Flickr and Unsplash images, cache-first")]
struct Cli {
    /// Config file (default: ~/.photostream/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and print photo metadata
    Info {
        #[command(subcommand)]
        target: InfoTarget,
    },
    /// Download one size variant of a photo
    Fetch {
        #[command(subcommand)]
        target: FetchTarget,
    },
    /// Remove a photo's cached data and metadata
    Evict {
        /// flickr or unsplash
        provider: ProviderKind,
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    // Logging goes first: the local time offset is only readable single-threaded.
    let log_file = &config.logging.file;
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE_NAME);
    let _guard = logging::init_logging(log_dir, file_name, cli.verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

    runtime.block_on(async {
        match cli.command {
            Commands::Info { target } => commands::info::run(&config, target).await,
            Commands::Fetch { target } => commands::fetch::run(&config, target).await,
            Commands::Evict { provider, id } => commands::evict::run(&config, provider, &id).await,
        }
    })
}
