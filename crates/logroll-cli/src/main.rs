//! logroll CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logroll_cli::cli::{Cli, Commands};
use logroll_cli::commands::{DemoCommand, GenerationsCommand, PruneCommand, WriteCommand};
use logroll_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Diagnostics go to stderr; RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), logroll_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Demo(args) => DemoCommand::new().execute(&mut stdout, &format, &args)?,
        Commands::Write(args) => WriteCommand::new().execute(&args)?,
        Commands::Prune(args) => PruneCommand::new().execute(&mut stdout, &format, &args)?,
        Commands::Generations(args) => {
            GenerationsCommand::new().execute(&mut stdout, &format, &args)?;
        }
    }

    Ok(())
}
