//! # logroll-cli
//!
//! Command-line front end for the `logroll` crate.
//!
//! Provides commands for:
//! - Running a demo write load across two categories
//! - Writing one line to a category from a JSON registry config
//! - Listing and pruning rotated generations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
