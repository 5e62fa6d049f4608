//! Husk CLI - shake unreachable top-level code out of generated JavaScript.
//!
//! This crate provides the command-line interface for `husk-shaker`: it
//! layers configuration from `husk.toml`, `HUSK_*` environment variables and
//! flags, runs the shaker over a file, and reports the result.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`commands`] - `shake` and `analyze` implementations
//! - [`config`] - Figment-based configuration loading
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use husk_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, ConfigError, Result, ResultExt};
