//! Configuration for the operation registry.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`RegistryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the operation registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directories searched, in order, for grid files named by relative paths.
    pub grid_directories: Vec<PathBuf>,

    /// Number of parsed grids kept in memory by the file loader.
    pub grid_cache_entries: usize,

    /// Whether plain lookups may resolve deprecated names and codes.
    pub include_deprecated: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            grid_directories: vec![PathBuf::from("grids")],
            grid_cache_entries: 8,
            include_deprecated: false,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with the environment variables that are set.
    ///
    /// - `CRS_GRID_PATH`: colon-separated grid directories
    /// - `CRS_GRID_CACHE_ENTRIES`: grid cache size
    /// - `CRS_INCLUDE_DEPRECATED`: `true` or `1` to resolve deprecated identifiers
    pub fn merge_env(mut self) -> Self {
        if let Ok(val) = std::env::var("CRS_GRID_PATH") {
            let dirs: Vec<PathBuf> = std::env::split_paths(&val)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !dirs.is_empty() {
                self.grid_directories = dirs;
            }
        }

        if let Ok(val) = std::env::var("CRS_GRID_CACHE_ENTRIES") {
            if let Ok(entries) = val.parse() {
                self.grid_cache_entries = entries;
            }
        }

        if let Ok(val) = std::env::var("CRS_INCLUDE_DEPRECATED") {
            self.include_deprecated = val.to_lowercase() == "true" || val == "1";
        }

        self
    }

    /// Load configuration from a YAML file. Missing fields take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cache_entries == 0 {
            return Err(ConfigError::Invalid("grid_cache_entries must be > 0".to_string()));
        }

        if self.grid_directories.is_empty() {
            return Err(ConfigError::Invalid(
                "grid_directories must name at least one directory".to_string(),
            ));
        }

        Ok(())
    }

    /// The cache size as the loader expects it.
    pub fn cache_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.grid_cache_entries)
            .ok_or_else(|| ConfigError::Invalid("grid_cache_entries must be > 0".to_string()))
    }
}
