//! Error types for the rotating logger.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring, writing or rotating a log stream.
#[derive(Debug, Error)]
pub enum LogError {
    /// A severity token did not match any known level.
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// A category with this name is already registered.
    #[error("category already registered: {0}")]
    DuplicateCategory(String),

    /// No category with this name is registered.
    #[error("category not registered: {0}")]
    UnknownCategory(String),

    /// The log path has no usable file name.
    #[error("invalid log path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The active file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The active file could not be stat'ed for its size.
    #[error("failed to stat {}: {source}", path.display())]
    Stat {
        /// Path that failed to stat.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The active file could not be renamed to a generation.
    #[error("failed to rotate {} to {}: {source}", from.display(), to.display())]
    Rename {
        /// Active file path.
        from: PathBuf,
        /// Generation path the rename targeted.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The log directory could not be listed for pruning.
    #[error("failed to list generations in {}: {source}", dir.display())]
    ListGenerations {
        /// Directory being listed.
        dir: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The active file could not be reopened after a rotation attempt,
    /// whether or not the rename succeeded. The logger has no handle until a
    /// later reopen succeeds.
    #[error("failed to reopen {} after rotation: {source}", path.display())]
    Reopen {
        /// Active file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Appending a line failed.
    #[error("failed to write to {}: {source}", path.display())]
    Write {
        /// Active file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Flushing the handle on close failed.
    #[error("failed to close {}: {source}", path.display())]
    Close {
        /// Active file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The logger was closed and accepts no further writes.
    #[error("logger for {} is closed", .0.display())]
    Closed(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LogError {
    /// Returns true for errors detected while setting up loggers or categories.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownLevel(_)
                | Self::DuplicateCategory(_)
                | Self::UnknownCategory(_)
                | Self::InvalidPath(_)
                | Self::InvalidConfig(_)
                | Self::Serialization(_)
        )
    }

    /// Returns true if the logger was left without a writable handle.
    #[must_use]
    pub const fn is_reopen_failure(&self) -> bool {
        matches!(self, Self::Reopen { .. })
    }
}

/// Result type alias for logger operations.
pub type Result<T> = std::result::Result<T, LogError>;
