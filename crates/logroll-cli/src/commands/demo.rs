//! Demo command implementation.
//!
//! Registers an `access` category at info level and a `diagnostic`
//! category at debug level, then writes to both in rounds so rotation and
//! pruning can be watched on disk.

use std::io::Write;
use std::thread;
use std::time::Duration;

use logroll::{Registry, Severity};
use serde::Serialize;
use tracing::info;

use crate::cli::DemoArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TableDisplay};

const DEMO_MESSAGE: &str = "test message";

/// Handler for the demo command.
pub struct DemoCommand;

impl DemoCommand {
    /// Creates a new demo command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the demo command.
    ///
    /// # Errors
    ///
    /// Returns error if a category cannot be opened or a write fails.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &DemoArgs,
    ) -> Result<(), CliError> {
        let registry = Registry::new();
        registry.register(
            "access",
            args.dir.join("access.log"),
            Severity::Info.as_str(),
            args.max_bytes,
            args.max_generations,
        )?;
        registry.register(
            "diagnostic",
            args.dir.join("diag.log"),
            Severity::Debug.as_str(),
            args.max_bytes,
            args.max_generations,
        )?;

        let access = registry.resolve("access")?;
        let diagnostic = registry.resolve("diagnostic")?;
        info!(iterations = args.iterations, dir = %args.dir.display(), "starting demo");

        let mut writes = 0u64;
        for round in 0..args.iterations {
            if round > 0 && args.interval_ms > 0 {
                thread::sleep(Duration::from_millis(args.interval_ms));
            }
            access.log("new access.")?;
            diagnostic.log(DEMO_MESSAGE)?;
            for severity in Severity::ALL {
                diagnostic.write(severity, DEMO_MESSAGE)?;
            }
            writes += 2 + Severity::ALL.len() as u64;
        }

        let mut summary = DemoSummary {
            writes,
            categories: Vec::new(),
        };
        for name in registry.names() {
            let logger = registry.resolve(&name)?;
            summary.categories.push(CategorySummary {
                path: logger.path().display().to_string(),
                generations: logger.rotator().generations()?.len(),
                name,
            });
        }
        registry.close_all()?;

        format.write(out, &summary)
    }
}

impl Default for DemoCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a demo run.
#[derive(Debug, Serialize)]
pub struct DemoSummary {
    /// Total lines written across categories.
    pub writes: u64,
    /// Per-category state after the run.
    pub categories: Vec<CategorySummary>,
}

/// State of one category after a demo run.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    /// Category name.
    pub name: String,
    /// Active file path.
    pub path: String,
    /// Rotated generations on disk.
    pub generations: usize,
}

impl TableDisplay for DemoSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Lines written: {}", self.writes)?;
        writeln!(writer)?;
        writeln!(writer, "{:<12} {:<12} PATH", "CATEGORY", "GENERATIONS")?;
        for category in &self.categories {
            writeln!(
                writer,
                "{:<12} {:<12} {}",
                category.name, category.generations, category.path
            )?;
        }
        Ok(())
    }
}
