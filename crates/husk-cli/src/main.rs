//! Husk CLI - shake unreachable top-level code out of generated JavaScript.
//!
//! This is the main entry point for the Husk CLI. It handles command-line
//! argument parsing, logging initialization, and command dispatch.

use clap::Parser;
use husk_cli::{cli, commands, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = std::env::current_dir()
        .map_err(error::CliError::from)
        .and_then(|cwd| commands::run(&args, &cwd));

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
