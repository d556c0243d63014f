//! Runner settings loaded through figment
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. The first `jobtools.{toml,yaml,yml,json}` found in the working directory
//! 3. `JOBTOOLS_*` environment variables (e.g. `JOBTOOLS_LOG_LEVEL=debug`)

use crate::error::{ConfigError, ConfigResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

/// Environment prefix for settings overrides
pub const ENV_PREFIX: &str = "JOBTOOLS_";

/// Settings file names, checked in this order
pub const SETTINGS_FILE_NAMES: &[&str] = &[
    "jobtools.toml",
    "jobtools.yaml",
    "jobtools.yml",
    "jobtools.json",
];

/// Knobs of the binder itself, not of any task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Extension searched for when a namespace flag names a directory
    pub default_extension: String,
    /// Separator for list-typed parameters
    pub list_delimiter: String,
    /// Log level used when no command line switch overrides it
    pub log_level: String,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            default_extension: crate::loader::DEFAULT_EXTENSION.to_string(),
            list_delimiter: ",".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl RunnerSettings {
    /// Load settings relative to the current working directory
    pub fn load() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::io(".", e))?;
        Self::load_from(&cwd)
    }

    /// Load settings using `dir` to look for a settings file
    pub fn load_from(dir: &Path) -> ConfigResult<Self> {
        let settings: Self = Self::figment(dir).extract()?;
        if settings.list_delimiter.is_empty() {
            return Err(ConfigError::Settings {
                source: Box::new(figment::Error::from(
                    "list_delimiter must not be empty".to_string(),
                )),
            });
        }

        debug!(
            "Runner settings: extension={}, delimiter='{}', log_level={}",
            settings.default_extension, settings.list_delimiter, settings.log_level
        );
        Ok(settings)
    }

    fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(file) = SETTINGS_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            trace!("Using settings file {}", file.display());
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(&file)),
                Some("json") => figment.merge(Json::file(&file)),
                _ => figment.merge(Yaml::file(&file)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults_without_sources() {
        let dir = TempDir::new().unwrap();
        let settings = RunnerSettings::load_from(dir.path()).unwrap();
        assert_eq!(settings, RunnerSettings::default());
    }

    #[test]
    #[serial]
    fn test_settings_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("jobtools.yaml"),
            "default_extension: json\nlist_delimiter: ';'\n",
        )
        .unwrap();

        let settings = RunnerSettings::load_from(dir.path()).unwrap();
        assert_eq!(settings.default_extension, "json");
        assert_eq!(settings.list_delimiter, ";");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("jobtools.toml"), "log_level = \"warn\"\n").unwrap();

        std::env::set_var("JOBTOOLS_LOG_LEVEL", "debug");
        let settings = RunnerSettings::load_from(dir.path());
        std::env::remove_var("JOBTOOLS_LOG_LEVEL");

        assert_eq!(settings.unwrap().log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_empty_delimiter_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("jobtools.json"), r#"{"list_delimiter": ""}"#).unwrap();

        let result = RunnerSettings::load_from(dir.path());
        assert!(matches!(result, Err(ConfigError::Settings { .. })));
    }
}
