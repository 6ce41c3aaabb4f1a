//! Traits for log sinks.
//!
//! [`LogSink`] abstracts over anything that accepts leveled lines, so code
//! can hold an `Arc<dyn LogSink>` without caring whether it writes to a
//! rotating file or to a test double.

use crate::error::Result;
use crate::logger::Logger;
use crate::severity::Severity;

/// A destination for leveled log lines.
pub trait LogSink: Send + Sync {
    /// Writes `message` at `severity`, subject to the sink's level filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    fn write(&self, severity: Severity, message: &str) -> Result<()>;

    /// Performs any pending size-based rollover. Returns whether one happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollover fails.
    fn rotate_if_needed(&self) -> Result<bool>;

    /// Releases the sink's resources.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn close(&self) -> Result<()>;

    /// Writes at [`Severity::Error`].
    fn error(&self, message: &str) -> Result<()> {
        self.write(Severity::Error, message)
    }

    /// Writes at [`Severity::Info`].
    fn info(&self, message: &str) -> Result<()> {
        self.write(Severity::Info, message)
    }
}

impl LogSink for Logger {
    fn write(&self, severity: Severity, message: &str) -> Result<()> {
        Logger::write(self, severity, message)
    }

    fn rotate_if_needed(&self) -> Result<bool> {
        Logger::rotate_if_needed(self)
    }

    fn close(&self) -> Result<()> {
        Logger::close(self)
    }
}
