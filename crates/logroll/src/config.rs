//! Configuration for loggers and category registries.
//!
//! This module provides:
//! - [`LoggerConfig`] — Resolved parameters for one log stream
//! - [`CategoryConfig`] — A named, serializable category binding
//! - [`RegistryConfig`] — A set of categories loaded from JSON

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};
use crate::severity::Severity;

/// Default rotation threshold (1 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Default number of rotated generations kept.
pub const DEFAULT_MAX_GENERATIONS: usize = 5;

/// Resolved parameters for a single rotating log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Directory holding the active file and its generations. Must exist.
    pub dir: PathBuf,
    /// Base file name of the active file.
    pub base_name: String,
    /// Least urgent severity that is still emitted.
    pub level: Severity,
    /// Size at which the active file is rotated (bytes).
    pub max_bytes: u64,
    /// Number of rotated generations kept by pruning.
    pub max_generations: usize,
}

impl LoggerConfig {
    /// Creates a config with default level and rotation policy.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            level: Severity::default(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }

    /// Creates a config from a full file path such as `./logs/access.log`.
    ///
    /// A path without a directory component resolves to the current directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let base_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| LogError::InvalidPath(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self::new(dir, base_name))
    }

    /// Creates a config from unparsed parameters, validating the level token.
    pub fn from_parts(
        dir: impl Into<PathBuf>,
        base_name: impl Into<String>,
        level: &str,
        max_bytes: u64,
        max_generations: usize,
    ) -> Result<Self> {
        let config = Self::new(dir, base_name)
            .with_level(level.parse()?)
            .with_max_bytes(max_bytes)
            .with_max_generations(max_generations);
        config.validate()?;
        Ok(config)
    }

    /// Sets the minimum severity.
    #[must_use]
    pub const fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Sets the rotation threshold.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Sets the number of retained generations.
    #[must_use]
    pub const fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Path of the active file.
    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }

    /// Checks that the config describes a usable stream.
    pub fn validate(&self) -> Result<()> {
        if self.base_name.is_empty()
            || self.base_name.contains(std::path::is_separator)
            || self.base_name == "."
            || self.base_name == ".."
        {
            return Err(LogError::InvalidPath(self.active_path()));
        }
        if self.max_bytes == 0 {
            return Err(LogError::InvalidConfig(
                "max_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A category binding as it appears in a registry config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name used for lookups.
    pub name: String,
    /// Full path of the active file.
    pub path: PathBuf,
    /// Minimum severity.
    #[serde(default)]
    pub level: Severity,
    /// Rotation threshold in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Retained generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl CategoryConfig {
    /// Resolves this binding into a validated [`LoggerConfig`].
    pub fn to_logger_config(&self) -> Result<LoggerConfig> {
        let config = LoggerConfig::from_path(&self.path)?
            .with_level(self.level)
            .with_max_bytes(self.max_bytes)
            .with_max_generations(self.max_generations);
        config.validate()?;
        Ok(config)
    }
}

/// A set of categories, typically loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Category bindings, in registration order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl RegistryConfig {
    /// Parses a registry config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a registry config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

const fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

const fn default_max_generations() -> usize {
    DEFAULT_MAX_GENERATIONS
}
