//! Write command implementation.

use logroll::{Registry, RegistryConfig, Severity};
use tracing::debug;

use crate::cli::WriteArgs;
use crate::error::CliError;

/// Handler for the write command.
pub struct WriteCommand;

impl WriteCommand {
    /// Creates a new write command handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the write command.
    ///
    /// # Errors
    ///
    /// Returns error if the config cannot be loaded, the category or level
    /// is unknown, or the write fails.
    pub fn execute(&self, args: &WriteArgs) -> Result<(), CliError> {
        let config = RegistryConfig::load(&args.config)?;
        let registry = Registry::from_config(&config)?;
        let logger = registry.resolve(&args.category)?;
        let message = args.message.join(" ");

        match args.level.as_deref() {
            Some(level) => logger.write(level.parse::<Severity>()?, &message)?,
            None => logger.log(&message)?,
        }
        debug!(category = %args.category, path = %logger.path().display(), "wrote line");

        registry.close_all()?;
        Ok(())
    }
}

impl Default for WriteCommand {
    fn default() -> Self {
        Self::new()
    }
}
