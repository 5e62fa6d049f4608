//! Shared utilities for command implementations.

use crate::error::{CliError, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a path relative to a working directory.
///
/// If the path is absolute, returns it unchanged. Otherwise, joins it with
/// the working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Validate that an input file exists and is a regular file.
///
/// # Errors
///
/// Returns `CliError::FileNotFound` if the file doesn't exist and
/// `CliError::InvalidArgument` if it is not a file.
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(CliError::FileNotFound(input.to_path_buf()));
    }

    if !input.is_file() {
        return Err(CliError::InvalidArgument(format!(
            "Input is not a file: {}",
            input.display()
        )));
    }

    Ok(())
}

/// Write `contents` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns I/O errors from directory creation or the write itself.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
    }
    fs::write(path, contents).with_path(path)
}
