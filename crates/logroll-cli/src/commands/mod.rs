//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`demo`] - Steady write load over two categories
//! - [`write`] - One-off write to a configured category
//! - [`generations`] - Listing and pruning rotated files

pub mod demo;
pub mod generations;
pub mod write;

pub use demo::DemoCommand;
pub use generations::{GenerationsCommand, PruneCommand};
pub use write::WriteCommand;
