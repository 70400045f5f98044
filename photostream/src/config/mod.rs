//! Configuration file loading.

mod file;
mod size;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{
    CacheSettings, ConfigFile, FlickrSettings, GeocodeSettings, LoggingSettings, NetworkSettings,
    UnsplashSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_FILE_NAME,
};
pub use size::{format_size, parse_size};

/// Errors from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// INI syntax error in text not read from a file.
    #[error("Invalid INI syntax: {0}")]
    Syntax(String),

    #[error("Invalid size '{0}' (expected e.g. 512KB, 256MB, 2GB)")]
    InvalidSize(String),

    #[error("Invalid value for [{section}] {key}: '{value}'")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}
