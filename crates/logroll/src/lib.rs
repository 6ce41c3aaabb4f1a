//! # logroll
//!
//! Leveled file logging with size-based rotation and retention pruning.
//!
//! This crate provides:
//!
//! - [`Logger`] — One rotating log stream with a level filter
//! - [`Rotator`] — Size check, rename and generation pruning
//! - [`Registry`] — Named categories resolving to shared loggers
//! - [`Severity`] — Levels from `Fatal` (most urgent) to `Debug`
//! - [`LoggerConfig`] / [`RegistryConfig`] — Configuration types
//! - [`LogSink`] — Abstract trait for log destinations
//!
//! ## Example
//!
//! ```rust,no_run
//! use logroll::{Logger, LoggerConfig, Registry, Severity};
//!
//! # fn main() -> logroll::Result<()> {
//! // A single stream
//! let config = LoggerConfig::new("/var/log/myapp", "app.log")
//!     .with_level(Severity::Notice)
//!     .with_max_bytes(1024 * 1024)
//!     .with_max_generations(5);
//! let logger = Logger::open(&config)?;
//! logger.warn("disk usage above 90%")?;
//!
//! // Or named categories
//! let registry = Registry::new();
//! registry.register("access", "/var/log/myapp/access.log", "info", 1024 * 1024, 5)?;
//! registry.resolve("access")?.info("GET /")?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod format;
pub mod logger;
pub mod registry;
pub mod rotator;
pub mod severity;
pub mod traits;

// Re-export main types
pub use config::{
    CategoryConfig, DEFAULT_MAX_BYTES, DEFAULT_MAX_GENERATIONS, LoggerConfig, RegistryConfig,
};
pub use error::{LogError, Result};
pub use format::format_line;
pub use logger::Logger;
pub use registry::Registry;
pub use rotator::{Generation, PruneOutcome, Rotator};
pub use severity::Severity;
pub use traits::LogSink;
