//! Loading and saving namespace documents
//!
//! The format is always chosen from the file extension, on the way in and on
//! the way out. Reads are neither cached nor retried; a failed read surfaces
//! immediately.

use crate::error::{ConfigError, ConfigResult};
use crate::format::ConfigFormat;
use crate::namespace::NestedNamespace;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Extension looked for when a directory is given instead of a file
pub const DEFAULT_EXTENSION: &str = "yml";

/// Decodes YAML/JSON files into [`NestedNamespace`] values and writes them back
#[derive(Debug, Clone)]
pub struct NestedConfigLoader {
    default_extension: String,
}

impl NestedConfigLoader {
    pub fn new() -> Self {
        Self {
            default_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Change the extension used to pick a file out of a directory
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    /// Load a namespace from `path`
    ///
    /// When `path` is a directory the first file (by name) carrying the
    /// default extension is loaded instead.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<NestedNamespace> {
        let requested = path.as_ref();
        let path = if requested.is_dir() {
            warn!(
                "Configuration path '{}' is a directory but a file is expected; looking for the first `{}` file",
                requested.display(),
                self.default_extension
            );
            self.first_file_in(requested)?
        } else {
            requested.to_path_buf()
        };

        let format = ConfigFormat::from_path(&path)
            .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.clone() })?;

        debug!("Loading {} namespace from {}", format, path.display());
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;

        if content.trim().is_empty() {
            warn!("Configuration file {} is empty", path.display());
            return Ok(NestedNamespace::new());
        }

        let namespace = decode(&content, format).map_err(|message| {
            ConfigError::decode(&path, format.name(), message)
        })?;

        trace!(
            "Decoded {} top-level keys from {}",
            namespace.len(),
            path.display()
        );
        Ok(namespace)
    }

    /// Write `namespace` to `path` in the format its extension names
    pub fn save(&self, namespace: &NestedNamespace, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let content = encode(namespace, format).map_err(|message| ConfigError::Encode {
            path: path.to_path_buf(),
            message,
        })?;

        debug!("Saving {} namespace to {}", format, path.display());
        fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    fn first_file_in(&self, dir: &Path) -> ConfigResult<PathBuf> {
        let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| ConfigError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|candidate| {
                candidate.is_file()
                    && candidate
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext == self.default_extension)
            })
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::EmptyDirectory {
                path: dir.to_path_buf(),
                extension: self.default_extension.clone(),
            })
    }
}

impl Default for NestedConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(content: &str, format: ConfigFormat) -> Result<NestedNamespace, String> {
    match format {
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

fn encode(namespace: &NestedNamespace, format: ConfigFormat) -> Result<String, String> {
    match format {
        ConfigFormat::Yaml => serde_yaml_ng::to_string(namespace).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(namespace).map_err(|e| e.to_string()),
    }
}

impl NestedNamespace {
    /// Load with the default loader settings
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        NestedConfigLoader::new().load(path)
    }

    /// Save with the default loader settings
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        NestedConfigLoader::new().save(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.yml");
        fs::write(&path, "budget: 700\ntrips:\n  origin: BUE\n").unwrap();

        let ns = NestedConfigLoader::new().load(&path).unwrap();
        assert_eq!(ns.get_i64("budget"), Some(700));
        assert_eq!(ns.get_str("trips.origin"), Some("BUE"));
    }

    #[test]
    fn test_unknown_extension_is_rejected_before_reading() {
        let result = NestedConfigLoader::new().load("does-not-exist.toml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = NestedConfigLoader::new().load("does-not-exist.yml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_undecodable_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = NestedConfigLoader::new().load(&path);
        assert!(matches!(result, Err(ConfigError::Decode { .. })));
    }

    #[test]
    fn test_directory_picks_first_matching_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.yml"), "value: 2\n").unwrap();
        fs::write(dir.path().join("a.yml"), "value: 1\n").unwrap();
        fs::write(dir.path().join("0.json"), "{\"value\": 0}").unwrap();

        let ns = NestedConfigLoader::new().load(dir.path()).unwrap();
        assert_eq!(ns.get_i64("value"), Some(1));

        let ns = NestedConfigLoader::new()
            .with_default_extension(".json")
            .load(dir.path())
            .unwrap();
        assert_eq!(ns.get_i64("value"), Some(0));
    }

    #[test]
    fn test_directory_without_candidates() {
        let dir = TempDir::new().unwrap();
        let result = NestedConfigLoader::new().load(dir.path());
        assert!(matches!(result, Err(ConfigError::EmptyDirectory { .. })));
    }

    #[test]
    fn test_empty_yaml_is_empty_namespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();

        assert!(NestedNamespace::load(&path).unwrap().is_empty());
    }
}
