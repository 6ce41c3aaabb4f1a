//! Generation listing and pruning commands.
//!
//! Both work on the directory listing alone and never open the active file.
//! Rotation locking is per process, so do not prune while another process
//! is rotating the same file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use logroll::{Generation, Rotator};
use serde::Serialize;

use crate::cli::{GenerationsArgs, PruneArgs};
use crate::error::CliError;
use crate::output::{OutputFormat, TableDisplay};

/// Handler for the generations command.
pub struct GenerationsCommand;

impl GenerationsCommand {
    /// Creates a new generations command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the generations command.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be listed.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &GenerationsArgs,
    ) -> Result<(), CliError> {
        let rotator = Rotator::new(&args.dir, args.name.as_str(), u64::MAX, usize::MAX);
        let listing = GenerationList {
            active: rotator.active_path(),
            generations: rotator
                .generations()?
                .iter()
                .map(GenerationInfo::from)
                .collect(),
        };
        format.write(out, &listing)
    }
}

impl Default for GenerationsCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for the prune command.
pub struct PruneCommand;

impl PruneCommand {
    /// Creates a new prune command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the prune command.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be listed. Individual deletion
    /// failures are reported in the output instead.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &PruneArgs,
    ) -> Result<(), CliError> {
        let rotator = Rotator::new(&args.dir, args.name.as_str(), u64::MAX, args.keep);
        let outcome = rotator.remove_old_generations()?;
        let report = PruneReport {
            kept: rotator.generations()?.len(),
            removed: outcome.removed,
            failed: outcome.failed,
        };
        format.write(out, &report)
    }
}

impl Default for PruneCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotated generations of one log file.
#[derive(Debug, Serialize)]
pub struct GenerationList {
    /// Active file path.
    pub active: PathBuf,
    /// Generations, oldest first.
    pub generations: Vec<GenerationInfo>,
}

/// One rotated generation.
#[derive(Debug, Serialize)]
pub struct GenerationInfo {
    /// File path.
    pub path: PathBuf,
    /// Unix seconds of the rotation.
    pub timestamp: u64,
    /// Same-second collision sequence.
    pub seq: u32,
    /// Size in bytes, if the file could be stat'ed.
    pub bytes: Option<u64>,
}

impl From<&Generation> for GenerationInfo {
    fn from(generation: &Generation) -> Self {
        Self {
            path: generation.path.clone(),
            timestamp: generation.timestamp,
            seq: generation.seq,
            bytes: fs::metadata(&generation.path).map(|m| m.len()).ok(),
        }
    }
}

impl TableDisplay for GenerationList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Active: {}", self.active.display())?;
        if self.generations.is_empty() {
            writeln!(writer, "No rotated generations.")?;
            return Ok(());
        }
        writeln!(writer)?;
        writeln!(writer, "{:<12} {:<6} {:<10} PATH", "TIMESTAMP", "SEQ", "BYTES")?;
        for generation in &self.generations {
            let bytes = generation
                .bytes
                .map_or_else(|| "-".to_string(), |b| b.to_string());
            writeln!(
                writer,
                "{:<12} {:<6} {:<10} {}",
                generation.timestamp,
                generation.seq,
                bytes,
                generation.path.display()
            )?;
        }
        Ok(())
    }
}

/// Result of a prune run.
#[derive(Debug, Serialize)]
pub struct PruneReport {
    /// Generations left on disk.
    pub kept: usize,
    /// Generations deleted.
    pub removed: Vec<PathBuf>,
    /// Generations that could not be deleted.
    pub failed: Vec<PathBuf>,
}

impl TableDisplay for PruneReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "Removed {} generation(s), kept {}.",
            self.removed.len(),
            self.kept
        )?;
        for path in &self.removed {
            writeln!(writer, "  removed {}", path.display())?;
        }
        for path in &self.failed {
            writeln!(writer, "  failed  {}", path.display())?;
        }
        Ok(())
    }
}
