//! CLI error type.

use std::fmt;
use std::path::PathBuf;
use std::process;

use photostream::cache::CacheError;
use photostream::config::ConfigFileError;
use photostream::logging::LoggingError;
use photostream::provider::ProviderError;

/// Errors surfaced to the user.
#[derive(Debug)]
pub enum CliError {
    /// Failed to load the configuration file.
    ConfigFile(ConfigFileError),

    /// Configuration is incomplete for the requested command.
    Config(String),

    /// Failed to initialize logging.
    Logging(LoggingError),

    /// Failed to open the cache.
    Cache(CacheError),

    /// A provider request failed.
    Provider(ProviderError),

    /// Failed to write output.
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Cache(e) => write!(f, "Failed to open cache: {}", e),
            CliError::Provider(e) => write!(f, "{}", e),
            CliError::Output { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Output { source, .. } => Some(source),
            CliError::Config(_) | CliError::RuntimeCreation(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}
