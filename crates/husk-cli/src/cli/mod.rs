//! Command-line interface definition for Husk.
//!
//! # Command Structure
//!
//! - `husk shake` - Remove unreachable top-level code from one file
//! - `husk analyze` - Print the element index and reachability as JSON

mod commands;
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{AnalyzeArgs, Command, ShakeArgs};
pub use validation::parse_marker;

/// Husk - a tree shaker for generated JavaScript
#[derive(Parser, Debug)]
#[command(
    name = "husk",
    version,
    about = "Remove unreachable top-level code from generated JavaScript",
    long_about = "Husk removes top-level declarations that cannot be reached from a program's\n\
                  globals and entry-point calls. It is meant for the flattened output of code\n\
                  generators, where every class and helper sits at the top level."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a config file (TOML, or JSON with a .json extension)
    ///
    /// Defaults to husk.toml in the working directory when it exists.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the entry-point marker function [default: RunEntry]
    #[arg(long, global = true, value_name = "NAME", value_parser = parse_marker)]
    pub entry_marker: Option<String>,

    /// Name of the inheritance marker function [default: $inherits]
    #[arg(long, global = true, value_name = "NAME", value_parser = parse_marker)]
    pub inherits_marker: Option<String>,

    /// Parse the input as an ES module instead of a classic script
    #[arg(long, global = true)]
    pub module: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
