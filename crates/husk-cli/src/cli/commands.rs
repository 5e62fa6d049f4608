use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Husk subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shake one JavaScript file
    ///
    /// Keeps every global statement, every entry-point call and everything
    /// they transitively reference. Input that does not parse is copied
    /// unchanged.
    Shake(ShakeArgs),

    /// Show which elements are indexed and which survive shaking
    Analyze(AnalyzeArgs),
}

/// Arguments for the shake command
#[derive(Args, Debug)]
pub struct ShakeArgs {
    /// JavaScript file to shake
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the result here instead of stdout
    ///
    /// May be the input file itself; the input is fully read before
    /// anything is written.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JavaScript file to analyze
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the analysis JSON to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}
