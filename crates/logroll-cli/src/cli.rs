//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use logroll::{DEFAULT_MAX_BYTES, DEFAULT_MAX_GENERATIONS};

/// logroll - leveled, rotating file logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "logroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Drive `access` and `diagnostic` categories with a steady write load.
    Demo(DemoArgs),

    /// Write one line to a category from a registry config file.
    Write(WriteArgs),

    /// Delete the oldest rotated generations of a log file.
    Prune(PruneArgs),

    /// List rotated generations of a log file, oldest first.
    Generations(GenerationsArgs),
}

/// Arguments for the demo command.
#[derive(Parser, Debug, Clone)]
pub struct DemoArgs {
    /// Existing directory for `access.log` and `diag.log`.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Number of write rounds.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub iterations: u32,

    /// Pause between rounds in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Rotation threshold in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,

    /// Rotated generations to keep.
    #[arg(long, default_value_t = DEFAULT_MAX_GENERATIONS)]
    pub max_generations: usize,
}

/// Arguments for the write command.
#[derive(Parser, Debug, Clone)]
pub struct WriteArgs {
    /// Registry config (JSON) defining the categories.
    #[arg(short, long, env = "LOGROLL_CONFIG")]
    pub config: PathBuf,

    /// Category to write to.
    #[arg(long)]
    pub category: String,

    /// Severity of the line. Without it the line is written untagged.
    #[arg(short, long)]
    pub level: Option<String>,

    /// Message words, joined with spaces.
    #[arg(required = true)]
    pub message: Vec<String>,
}

/// Arguments for the prune command.
#[derive(Parser, Debug, Clone)]
pub struct PruneArgs {
    /// Directory holding the log file.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Base name of the active log file.
    #[arg(short, long)]
    pub name: String,

    /// Generations to keep.
    #[arg(short, long)]
    pub keep: usize,
}

/// Arguments for the generations command.
#[derive(Parser, Debug, Clone)]
pub struct GenerationsArgs {
    /// Directory holding the log file.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Base name of the active log file.
    #[arg(short, long)]
    pub name: String,
}
