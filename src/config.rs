//! Run configuration.
//!
//! Configuration is optional and stored in TOML:
//!
//! ```toml
//! destination = "/media/library"
//! month_format = "numeric"   # or "name"
//!
//! [types]
//! heic = "picture"
//! mts = "movie"
//! ```
//!
//! `destination` is the root of the `picture/` and `movie/` trees and
//! defaults to the working directory. Entries under `[types]` are added to
//! the standard extension table.

use crate::destination::MonthFormat;
use crate::media_type::{Category, TypeMapper};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid { path: PathBuf, reason: String },
    /// A `[types]` entry names a category that does not exist.
    UnknownCategory {
        extension: String,
        category: String,
    },
    /// A `[types]` entry tries to remap an extension from the standard table.
    OverridesStandardType(String),
    /// IO error while reading configuration.
    IoError { path: PathBuf, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid { path, reason } => {
                write!(f, "Invalid configuration in {}: {}", path.display(), reason)
            }
            ConfigError::UnknownCategory {
                extension,
                category,
            } => write!(
                f,
                "Unknown category '{}' for extension '{}': expected picture or movie",
                category, extension
            ),
            ConfigError::OverridesStandardType(extension) => write!(
                f,
                "Extension '{}' is already mapped by the standard table and cannot be remapped",
                extension
            ),
            ConfigError::IoError { path, reason } => {
                write!(f, "IO error reading configuration {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the destination tree.
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    #[serde(default)]
    pub month_format: MonthFormat,

    /// Extra extension to category mappings, by category name.
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

fn default_destination() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load configuration, falling back to defaults.
    ///
    /// Looks in this order:
    /// 1. `config_path`, if provided
    /// 2. `.picmanrc.toml` in the current directory
    /// 3. `~/.config/picman/config.toml`
    /// 4. defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found (or explicitly
    /// provided) but cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".picmanrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("picman")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Builds the extension table for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` if a `[types]` entry does not
    /// name `picture` or `movie`, and `ConfigError::OverridesStandardType`
    /// if it names an extension the standard table already maps.
    pub fn type_mapper(&self) -> Result<TypeMapper, ConfigError> {
        let extra = self
            .types
            .iter()
            .map(|(ext, name)| {
                if TypeMapper::is_standard(ext) {
                    return Err(ConfigError::OverridesStandardType(ext.clone()));
                }
                Category::from_name(name)
                    .map(|category| (ext.as_str(), category))
                    .ok_or_else(|| ConfigError::UnknownCategory {
                        extension: ext.clone(),
                        category: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TypeMapper::with_extra(extra))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            month_format: MonthFormat::default(),
            types: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.destination, PathBuf::from("."));
        assert_eq!(config.month_format, MonthFormat::Numeric);
        assert!(config.types.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.destination, PathBuf::from("."));
        assert_eq!(config.month_format, MonthFormat::Numeric);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            destination = "/media/library"
            month_format = "name"

            [types]
            heic = "picture"
            mts = "movie"
            "#,
        )
        .unwrap();

        assert_eq!(config.destination, PathBuf::from("/media/library"));
        assert_eq!(config.month_format, MonthFormat::Name);
        assert_eq!(config.types.len(), 2);
    }

    #[test]
    fn test_type_mapper_adds_extra_types() {
        let mut config = Config::default();
        config.types.insert("heic".to_string(), "picture".to_string());
        config.types.insert("MTS".to_string(), "movie".to_string());

        let mapper = config.type_mapper().unwrap();
        assert_eq!(mapper.classify("HEIC"), Some(Category::Picture));
        assert_eq!(mapper.classify("mts"), Some(Category::Movie));
        assert_eq!(mapper.classify("jpg"), Some(Category::Picture));
    }

    #[test]
    fn test_type_mapper_rejects_unknown_category() {
        let mut config = Config::default();
        config.types.insert("mp3".to_string(), "audio".to_string());

        let result = config.type_mapper();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownCategory { ref extension, .. }) if extension == "mp3"
        ));
    }

    #[test]
    fn test_type_mapper_rejects_standard_override() {
        let mut config = Config::default();
        config.types.insert("CR2".to_string(), "picture".to_string());

        let result = config.type_mapper();
        assert!(matches!(
            result,
            Err(ConfigError::OverridesStandardType(ref ext)) if ext == "CR2"
        ));
    }

    #[test]
    fn test_invalid_month_format_rejected() {
        let result: Result<Config, _> = toml::from_str("month_format = \"roman\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("picman.toml");
        fs::write(&config_path, "destination = \"out\"\n").expect("Failed to write config");

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.destination, PathBuf::from("out"));
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Config::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("picman.toml");
        fs::write(&config_path, "destination = [").expect("Failed to write config");

        let result = Config::load(Some(&config_path));
        match result {
            Err(ConfigError::ConfigInvalid { path, .. }) => assert_eq!(path, config_path),
            other => panic!("expected ConfigInvalid, got {:?}", other),
        }
        let err = Config::load(Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("picman.toml"));
    }
}
