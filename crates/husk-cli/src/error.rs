//! Error handling for the Husk CLI.
//!
//! Commands return [`CliError`]. Domain errors convert into it through
//! `#[from]`, and `main` turns it into a `miette` report for display.
//!
//! # Example
//!
//! ```rust,no_run
//! use husk_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_input(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod diagnostic;

use std::path::PathBuf;
use thiserror::Error;

pub use diagnostic::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid syntax, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors from the shaker itself
    #[error("Shake failed: {0}")]
    Shake(#[from] husk_shaker::ShakeError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input that cannot be analyzed because it does not parse
    #[error("Input does not parse as JavaScript: {}\n\nHint: `husk shake` copies such input unchanged; check --module for ES module sources", .0.display())]
    Unparsable(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file given with --config doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a husk.toml file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Sources could not be merged into a configuration
    #[error("Invalid configuration: {0}\n\nHint: Check husk.toml syntax and HUSK_* environment variables")]
    Extract(String),

    /// Merged configuration was rejected by the shaker
    #[error("{0}\n\nHint: Marker names must be distinct JavaScript identifiers")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(err.to_string())
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait attaching the offending path to I/O errors.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use husk_shaker::{ShakeError, ShakePhase};

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("custom.toml"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("custom.toml"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_cli_error_from_shake_error() {
        let shake_err = ShakeError::Io {
            phase: ShakePhase::Reconstructing,
            source: std::io::Error::other("disk full"),
        };
        let cli_err: CliError = shake_err.into();
        assert!(matches!(cli_err, CliError::Shake(_)));
        assert!(cli_err.to_string().contains("while reconstructing"));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/app.js").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_path_keeps_other_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_path("/test/app.js").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
