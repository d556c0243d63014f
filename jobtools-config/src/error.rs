//! Error types for the jobtools configuration layer

use jobtools_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing a configuration file failed
    #[error("Failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but its content is not a valid document
    #[error("Failed to decode {format} configuration {path}: {message}")]
    Decode {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// The namespace could not be rendered into the target format
    #[error("Failed to encode configuration for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// A directory was given but holds no file with the expected extension
    #[error("No `{extension}` file found under directory {path}")]
    EmptyDirectory { path: PathBuf, extension: String },

    /// Configuration file format not supported
    #[error("Unsupported configuration file format for {path}: only YAML (.yml, .yaml) or JSON (.json) are supported")]
    UnsupportedFormat { path: PathBuf },

    /// Runner settings could not be extracted
    #[error("Failed to load runner settings: {source}")]
    Settings { source: Box<figment::Error> },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(
        path: impl Into<PathBuf>,
        format: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        ConfigError::Decode {
            path: path.into(),
            format: format.into(),
            message: message.to_string(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Settings {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::Settings { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
