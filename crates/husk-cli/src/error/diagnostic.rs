//! Miette diagnostic conversion for CLI errors.

use crate::error::{CliError, ConfigError};
use husk_shaker::ShakeError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Shake(e) => shake_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    miette::miette!("Configuration error: {}", err)
}

fn shake_error_to_miette(err: ShakeError) -> Report {
    match err {
        ShakeError::SourceMismatch { parsed, reread } => miette::miette!(
            "Input changed while it was being shaken ({} bytes parsed, {} bytes re-read)\n\nHint: Make sure nothing else writes the input file, and do not shake a file onto itself while another process reads it",
            parsed,
            reread
        ),
        ShakeError::Io { phase, source } => {
            miette::miette!("I/O error while {}: {}", phase, source)
        }
        other => miette::miette!("{}", other),
    }
}
