//! Size-based rotation and retention pruning.
//!
//! This module provides:
//! - [`Rotator`] — Stateless policy deciding when to roll and which
//!   generations to prune
//! - [`Generation`] — A parsed rotated file name
//! - [`PruneOutcome`] — What a pruning pass removed
//!
//! Rotated generations are named `<base>-<unix seconds>`, with the seconds
//! zero-padded to a fixed width. A second rotation within the same second
//! gets a `-<seq>` suffix so it never replaces an earlier generation.
//! Ordering is always numeric on `(seconds, seq)`. Only names with exactly
//! these field widths are generations, so a sibling stream such as
//! `<base>-1` is never mistaken for one.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::LoggerConfig;
use crate::error::{LogError, Result};

/// Width of the zero-padded seconds field in generation names.
const SECONDS_WIDTH: usize = 10;

/// Width of the zero-padded collision sequence.
const SEQ_WIDTH: usize = 4;

/// Largest sequence that still fits in [`SEQ_WIDTH`] digits.
const MAX_SEQ: u32 = 9_999;

/// A rotated log file, identified by its embedded timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Full path of the rotated file.
    pub path: PathBuf,
    /// Unix seconds at which the rotation happened.
    pub timestamp: u64,
    /// Collision sequence within the same second (0 for the first).
    pub seq: u32,
}

impl Generation {
    /// Parses `file_name` as a generation of `base_name`.
    ///
    /// Returns `None` for the active file itself and for any name that
    /// merely shares the prefix, including another stream's active file
    /// like `<base_name>-1`.
    #[must_use]
    pub fn parse(dir: &Path, base_name: &str, file_name: &str) -> Option<Self> {
        let suffix = file_name.strip_prefix(base_name)?.strip_prefix('-')?;
        let (secs, seq) = match suffix.split_once('-') {
            Some((secs, seq)) => (secs, Some(seq)),
            None => (suffix, None),
        };
        let timestamp = parse_digits(secs, SECONDS_WIDTH)?;
        let seq = match seq {
            Some(seq) => u32::try_from(parse_digits(seq, SEQ_WIDTH)?).ok()?,
            None => 0,
        };
        Some(Self {
            path: dir.join(file_name),
            timestamp,
            seq,
        })
    }

    /// File name for a generation of `base_name` at `timestamp`.
    #[must_use]
    pub fn file_name(base_name: &str, timestamp: u64, seq: u32) -> String {
        if seq == 0 {
            format!("{base_name}-{timestamp:0SECONDS_WIDTH$}")
        } else {
            format!("{base_name}-{timestamp:0SECONDS_WIDTH$}-{seq:0SEQ_WIDTH$}")
        }
    }

    fn key(&self) -> (u64, u32) {
        (self.timestamp, self.seq)
    }
}

impl PartialOrd for Generation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Generation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.path.cmp(&other.path))
    }
}

fn parse_digits(s: &str, width: usize) -> Option<u64> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Result of a retention pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Generations that were deleted, oldest first.
    pub removed: Vec<PathBuf>,
    /// Generations that should have been deleted but could not be.
    pub failed: Vec<PathBuf>,
}

impl PruneOutcome {
    /// Returns true if every selected generation was deleted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Rotation policy for one active file.
///
/// The rotator holds no file handle. It stats, renames and lists the
/// directory directly, so the caller must serialize calls and close its
/// own handle before [`Rotator::rotate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotator {
    dir: PathBuf,
    base_name: String,
    max_bytes: u64,
    max_generations: usize,
}

impl Rotator {
    /// Creates a rotator for `<dir>/<base_name>`.
    #[must_use]
    pub fn new(
        dir: impl Into<PathBuf>,
        base_name: impl Into<String>,
        max_bytes: u64,
        max_generations: usize,
    ) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            max_bytes,
            max_generations,
        }
    }

    /// Creates a rotator from a logger config.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(
            config.dir.clone(),
            config.base_name.clone(),
            config.max_bytes,
            config.max_generations,
        )
    }

    /// Directory holding the active file and its generations.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base name of the active file.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Rotation threshold in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Number of generations kept by [`Rotator::remove_old_generations`].
    #[must_use]
    pub const fn max_generations(&self) -> usize {
        self.max_generations
    }

    /// Path of the active file.
    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }

    /// Returns true if the active file has reached the size threshold.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Stat`] if the active file cannot be stat'ed.
    pub fn is_rotatable(&self) -> Result<bool> {
        let path = self.active_path();
        let metadata = fs::metadata(&path).map_err(|source| LogError::Stat { path, source })?;
        Ok(metadata.len() >= self.max_bytes)
    }

    /// Renames the active file to a fresh generation and returns its path.
    ///
    /// Any handle on the active file must already be closed.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Rename`] if the rename fails; the active file is
    /// left in place.
    pub fn rotate(&self) -> Result<PathBuf> {
        let from = self.active_path();
        let to = self.next_generation_path(current_unix_seconds());
        fs::rename(&from, &to).map_err(|source| LogError::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!(from = %from.display(), to = %to.display(), "rotated log file");
        Ok(to)
    }

    /// Lists rotated generations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ListGenerations`] if the directory cannot be read.
    pub fn generations(&self) -> Result<Vec<Generation>> {
        let list_err = |source| LogError::ListGenerations {
            dir: self.dir.clone(),
            source,
        };
        let mut generations: Vec<Generation> = fs::read_dir(&self.dir)
            .map_err(list_err)?
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name();
                Generation::parse(&self.dir, &self.base_name, name.to_str()?)
            })
            .collect();
        generations.sort();
        Ok(generations)
    }

    /// Deletes the oldest generations until at most `max_generations` remain.
    ///
    /// The active file is never a candidate. Failures to delete individual
    /// generations are logged and recorded, and pruning carries on.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ListGenerations`] if the directory cannot be read.
    pub fn remove_old_generations(&self) -> Result<PruneOutcome> {
        let generations = self.generations()?;
        let excess = generations.len().saturating_sub(self.max_generations);
        let mut outcome = PruneOutcome::default();

        for generation in generations.into_iter().take(excess) {
            match fs::remove_file(&generation.path) {
                Ok(()) => outcome.removed.push(generation.path),
                Err(e) => {
                    warn!(
                        path = %generation.path.display(),
                        error = %e,
                        "failed to remove old log generation"
                    );
                    outcome.failed.push(generation.path);
                }
            }
        }

        if !outcome.removed.is_empty() {
            debug!(
                base = %self.base_name,
                removed = outcome.removed.len(),
                "pruned old log generations"
            );
        }
        Ok(outcome)
    }

    /// Picks a name that sorts after every existing generation of the same
    /// second, even when pruning has already removed the lower sequences.
    fn next_generation_path(&self, timestamp: u64) -> PathBuf {
        let mut seq = self
            .generations()
            .ok()
            .and_then(|generations| {
                generations
                    .iter()
                    .filter(|g| g.timestamp == timestamp)
                    .map(|g| g.seq)
                    .max()
            })
            .map_or(0, |seq| seq.saturating_add(1).min(MAX_SEQ));
        loop {
            let candidate = self
                .dir
                .join(Generation::file_name(&self.base_name, timestamp, seq));
            if seq >= MAX_SEQ || fs::symlink_metadata(&candidate).is_err() {
                return candidate;
            }
            seq += 1;
        }
    }
}

fn current_unix_seconds() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
