//! Named categories that resolve to shared loggers.
//!
//! A [`Registry`] is an explicit object: build one at startup and hand it
//! (usually behind an `Arc`) to whatever needs category lookups. Loggers
//! are opened lazily on first [`Registry::resolve`] and reused afterwards.
//! Two categories pointing at the same file share one [`Logger`], so one
//! path never has two handles racing to rotate it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::{LoggerConfig, RegistryConfig};
use crate::error::{LogError, Result};
use crate::logger::Logger;

#[derive(Debug)]
struct Category {
    config: LoggerConfig,
    logger: Option<Arc<Logger>>,
}

#[derive(Debug, Default)]
struct Inner {
    categories: HashMap<String, Category>,
    /// Materialized loggers keyed by normalized active path.
    streams: HashMap<PathBuf, Arc<Logger>>,
}

/// A table of named categories.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with every category in `config` registered.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicate category.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let registry = Self::new();
        for category in &config.categories {
            registry.register_config(&category.name, category.to_logger_config()?)?;
        }
        Ok(registry)
    }

    /// Registers a category writing to `path`.
    ///
    /// Nothing is opened until the category is first resolved.
    ///
    /// # Errors
    ///
    /// - [`LogError::UnknownLevel`] if `level` is not a known token
    /// - [`LogError::InvalidPath`] if `path` has no file name
    /// - [`LogError::DuplicateCategory`] if `name` is taken
    pub fn register(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        level: &str,
        max_bytes: u64,
        max_generations: usize,
    ) -> Result<()> {
        let config = LoggerConfig::from_path(path)?
            .with_level(level.parse()?)
            .with_max_bytes(max_bytes)
            .with_max_generations(max_generations);
        self.register_config(name, config)
    }

    /// Registers a category from an already resolved config.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or `name` is taken.
    pub fn register_config(&self, name: &str, config: LoggerConfig) -> Result<()> {
        config.validate()?;
        let mut inner = self.inner.lock();
        if inner.categories.contains_key(name) {
            return Err(LogError::DuplicateCategory(name.to_string()));
        }
        debug!(category = name, path = %config.active_path().display(), "registered log category");
        inner.categories.insert(
            name.to_string(),
            Category {
                config,
                logger: None,
            },
        );
        Ok(())
    }

    /// Returns the shared logger for `name`, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownCategory`] for an unregistered name, or
    /// [`LogError::Open`] if the file cannot be opened.
    pub fn resolve(&self, name: &str) -> Result<Arc<Logger>> {
        let mut inner = self.inner.lock();
        let Inner {
            categories,
            streams,
        } = &mut *inner;

        let category = categories
            .get_mut(name)
            .ok_or_else(|| LogError::UnknownCategory(name.to_string()))?;
        if let Some(logger) = &category.logger {
            return Ok(Arc::clone(logger));
        }

        let key = stream_key(&category.config);
        let logger = if let Some(existing) = streams.get(&key) {
            let rotator = existing.rotator();
            if existing.level() != category.config.level
                || rotator.max_bytes() != category.config.max_bytes
                || rotator.max_generations() != category.config.max_generations
            {
                warn!(
                    category = name,
                    path = %key.display(),
                    "category shares a file with different settings; reusing the open logger"
                );
            }
            Arc::clone(existing)
        } else {
            let logger = Arc::new(Logger::open(&category.config)?);
            streams.insert(key, Arc::clone(&logger));
            logger
        };

        category.logger = Some(Arc::clone(&logger));
        Ok(logger)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().categories.contains_key(name)
    }

    /// Registered category names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().categories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Closes every materialized logger.
    ///
    /// Every logger is closed even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first close error.
    pub fn close_all(&self) -> Result<()> {
        let streams: Vec<Arc<Logger>> = self.inner.lock().streams.values().cloned().collect();
        let mut first_err = None;
        for logger in streams {
            if let Err(e) = logger.close() {
                warn!(path = %logger.path().display(), error = %e, "failed to close logger");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Identity of a stream: the active path with its directory canonicalized
/// when possible, so `./logs/a.log` and `logs/a.log` map to one logger.
fn stream_key(config: &LoggerConfig) -> PathBuf {
    fs::canonicalize(&config.dir)
        .unwrap_or_else(|_| config.dir.clone())
        .join(&config.base_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::severity::Severity;
    use tempfile::TempDir;

    #[test]
    fn registry_register_and_resolve() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("access", dir.path().join("access.log"), "info", 1024, 5)
            .expect("register");

        assert!(registry.contains("access"));
        let logger = registry.resolve("access").expect("resolve");
        assert_eq!(logger.level(), Severity::Info);
        assert!(dir.path().join("access.log").exists());
    }

    #[test]
    fn registry_register_is_lazy() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("access", dir.path().join("access.log"), "info", 1024, 5)
            .expect("register");
        assert!(!dir.path().join("access.log").exists());
    }

    #[test]
    fn registry_rejects_duplicate_name() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("access", dir.path().join("a.log"), "info", 1024, 5)
            .expect("register");
        let result = registry.register("access", dir.path().join("b.log"), "debug", 1024, 5);
        assert!(matches!(result, Err(LogError::DuplicateCategory(name)) if name == "access"));
    }

    #[test]
    fn registry_rejects_unknown_level() {
        let registry = Registry::new();
        let result = registry.register("access", "access.log", "verbose", 1024, 5);
        assert!(matches!(result, Err(LogError::UnknownLevel(_))));
        assert!(!registry.contains("access"));
    }

    #[test]
    fn registry_resolve_unknown_name() {
        let registry = Registry::new();
        let result = registry.resolve("missing");
        assert!(matches!(result, Err(LogError::UnknownCategory(name)) if name == "missing"));
    }

    #[test]
    fn registry_resolve_returns_same_logger() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("access", dir.path().join("access.log"), "info", 1024, 5)
            .expect("register");

        let a = registry.resolve("access").expect("resolve");
        let b = registry.resolve("access").expect("resolve");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn registry_categories_sharing_a_path_share_a_logger() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("http", dir.path().join("shared.log"), "info", 1024, 5)
            .expect("register");
        let dotted = dir.path().join(".").join("shared.log");
        registry
            .register("grpc", dotted, "debug", 1024, 5)
            .expect("register");

        let http = registry.resolve("http").expect("resolve");
        let grpc = registry.resolve("grpc").expect("resolve");
        assert!(Arc::ptr_eq(&http, &grpc));
    }

    #[test]
    fn registry_resolve_open_failure_is_retryable() {
        let dir = TempDir::new().expect("create temp dir");
        let nested = dir.path().join("not-yet");
        let registry = Registry::new();
        registry
            .register("late", nested.join("late.log"), "info", 1024, 5)
            .expect("register");

        assert!(matches!(registry.resolve("late"), Err(LogError::Open { .. })));

        fs::create_dir(&nested).expect("create dir");
        assert!(registry.resolve("late").is_ok());
    }

    #[test]
    fn registry_from_config() {
        let dir = TempDir::new().expect("create temp dir");
        let config = RegistryConfig {
            categories: vec![
                CategoryConfig {
                    name: "access".to_string(),
                    path: dir.path().join("access.log"),
                    level: Severity::Info,
                    max_bytes: 1024,
                    max_generations: 5,
                },
                CategoryConfig {
                    name: "diagnostic".to_string(),
                    path: dir.path().join("diag.log"),
                    level: Severity::Debug,
                    max_bytes: 1024,
                    max_generations: 5,
                },
            ],
        };
        let registry = Registry::from_config(&config).expect("build registry");
        assert_eq!(registry.names(), vec!["access", "diagnostic"]);
        let diag = registry.resolve("diagnostic").expect("resolve");
        assert_eq!(diag.level(), Severity::Debug);
    }

    #[test]
    fn registry_close_all_closes_materialized_loggers() {
        let dir = TempDir::new().expect("create temp dir");
        let registry = Registry::new();
        registry
            .register("a", dir.path().join("a.log"), "info", 1024, 5)
            .expect("register");
        registry
            .register("b", dir.path().join("b.log"), "info", 1024, 5)
            .expect("register");

        let a = registry.resolve("a").expect("resolve");
        assert!(registry.close_all().is_ok());
        assert!(a.is_closed());
        assert!(matches!(a.info("late"), Err(LogError::Closed(_))));
        // Never resolved, so never opened.
        assert!(!dir.path().join("b.log").exists());
    }
}
