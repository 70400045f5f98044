//! INI configuration file.
//!
//! ```ini
//! [flickr]
//! api_key = ...
//!
//! [unsplash]
//! access_key = ...
//!
//! [geocode]
//! opencage_key = ...
//!
//! [cache]
//! directory = ~/.cache/photostream
//! memory_size = 256MB
//! disk_size = 2GB
//!
//! [network]
//! timeout_secs = 30
//!
//! [logging]
//! file = ~/.photostream/photostream.log
//! ```
//!
//! Every key is optional. Empty values count as unset.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use tracing::debug;

use super::size::parse_size;
use super::ConfigFileError;
use crate::cache::{CacheConfig, DEFAULT_DISK_CACHE_SIZE, DEFAULT_MEMORY_CACHE_SIZE};
use crate::provider::{ProviderCredentials, DEFAULT_TIMEOUT_SECS};

/// Directory under the home directory holding config and logs.
pub const CONFIG_DIR_NAME: &str = ".photostream";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log file name.
pub const DEFAULT_LOG_FILE_NAME: &str = "photostream.log";

/// Parsed configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub flickr: FlickrSettings,
    pub unsplash: UnsplashSettings,
    pub geocode: GeocodeSettings,
    pub cache: CacheSettings,
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default)]
pub struct FlickrSettings {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UnsplashSettings {
    pub access_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GeocodeSettings {
    /// OpenCage API key; geocoding is disabled when unset.
    pub opencage_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub memory_size: u64,
    /// Zero disables the disk tier.
    pub disk_size: u64,
}

#[derive(Debug, Clone)]
pub struct NetworkSettings {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let home = home_dir();
        Self {
            flickr: FlickrSettings::default(),
            unsplash: UnsplashSettings::default(),
            geocode: GeocodeSettings::default(),
            cache: CacheSettings {
                directory: home.join(".cache").join("photostream"),
                memory_size: DEFAULT_MEMORY_CACHE_SIZE,
                disk_size: DEFAULT_DISK_CACHE_SIZE,
            },
            network: NetworkSettings {
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                file: home.join(CONFIG_DIR_NAME).join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}

impl ConfigFile {
    /// `~/.photostream/config.ini`
    pub fn default_path() -> PathBuf {
        home_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Load from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents).map_err(|e| match e {
            ConfigFileError::Syntax(message) => ConfigFileError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse INI text, layering it over the defaults.
    pub fn parse(contents: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigFileError::Syntax(e.to_string()))?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("flickr")) {
            config.flickr.api_key = value(section, "api_key");
        }

        if let Some(section) = ini.section(Some("unsplash")) {
            config.unsplash.access_key = value(section, "access_key");
        }

        if let Some(section) = ini.section(Some("geocode")) {
            config.geocode.opencage_key = value(section, "opencage_key");
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(dir) = value(section, "directory") {
                config.cache.directory = expand_tilde(&dir);
            }
            if let Some(size) = value(section, "memory_size") {
                config.cache.memory_size = parse_size(&size)?;
            }
            if let Some(size) = value(section, "disk_size") {
                config.cache.disk_size = parse_size(&size)?;
            }
        }

        if let Some(section) = ini.section(Some("network")) {
            if let Some(secs) = value(section, "timeout_secs") {
                config.network.timeout_secs =
                    secs.parse().map_err(|_| ConfigFileError::InvalidValue {
                        section: "network",
                        key: "timeout_secs",
                        value: secs.clone(),
                    })?;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(file) = value(section, "file") {
                config.logging.file = expand_tilde(&file);
            }
        }

        Ok(config)
    }

    /// Provider credentials, empty where unset.
    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            flickr_api_key: self.flickr.api_key.clone().unwrap_or_default(),
            unsplash_access_key: self.unsplash.access_key.clone().unwrap_or_default(),
        }
    }

    /// Cache layout described by the `[cache]` section.
    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::memory(self.cache.memory_size);
        if self.cache.disk_size == 0 {
            config
        } else {
            config.with_disk(self.cache.directory.clone(), self.cache.disk_size)
        }
    }
}

fn value(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}
