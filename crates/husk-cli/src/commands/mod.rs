//! Command implementations for the Husk CLI.
//!
//! - [`shake`] - Remove unreachable top-level code from a file
//! - [`analyze`] - Report the element index and reachability
//!
//! Each command provides an `execute` function that takes its parsed
//! arguments and the merged shaker configuration.

pub mod analyze;
pub mod shake;
pub(crate) mod utils;

use std::path::Path;

use crate::cli::{Cli, Command};
use crate::config::{self, CliOverrides};
use crate::error::Result;

// Re-export execute functions for convenience
pub use analyze::execute as analyze_execute;
pub use shake::execute as shake_execute;

/// Load configuration for `cli` relative to `cwd` and run its subcommand.
///
/// # Errors
///
/// Returns configuration errors before any input is touched, then whatever
/// the subcommand reports.
pub fn run(cli: &Cli, cwd: &Path) -> Result<()> {
    let overrides = CliOverrides::from_cli(cli);
    let shaker_config = config::load(cli.config.as_deref(), cwd, &overrides)?;

    match &cli.command {
        Command::Shake(args) => shake_execute(args, shaker_config, cwd),
        Command::Analyze(args) => analyze_execute(args, shaker_config, cwd),
    }
}
