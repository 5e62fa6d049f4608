//! `husk shake` command implementation.

use std::io::{self, Write};
use std::path::Path;

use husk_shaker::{FsArtifactStore, ShakeOutcome, ShakeReport, ShakerConfig, TreeShaker};
use tracing::{debug, info, warn};

use crate::cli::ShakeArgs;
use crate::commands::utils::{resolve_path, validate_input, write_output};
use crate::error::{CliError, Result};

/// Execute the shake command.
///
/// The shaken code is buffered in full before it is written, so `--output`
/// may name the input file.
///
/// # Errors
///
/// Returns an error if the input is missing, the configured markers are
/// invalid, the shaker fails, or the output cannot be written. Input that
/// does not parse is not an error: it is copied unchanged.
pub fn execute(args: &ShakeArgs, config: ShakerConfig, cwd: &Path) -> Result<()> {
    let input = resolve_path(&args.input, cwd);
    validate_input(&input)?;

    let (store, unit, extension) = FsArtifactStore::locate(&input).ok_or_else(|| {
        CliError::InvalidArgument(format!("Input has no file name: {}", input.display()))
    })?;

    let shaker = TreeShaker::new(config)?;
    let mut shaken: Vec<u8> = Vec::new();
    let report = shaker.shake(&store, &unit, &extension, &mut shaken)?;

    match &args.output {
        Some(path) => write_output(&resolve_path(path, cwd), &shaken)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&shaken)?;
            stdout.flush()?;
        }
    }

    log_report(&input, &report);
    Ok(())
}

fn log_report(input: &Path, report: &ShakeReport) {
    match &report.outcome {
        ShakeOutcome::Shaken => info!(
            bytes = report.bytes_written,
            kept = report.items_kept,
            removed = report.items_removed,
            "Shook {}",
            input.display()
        ),
        ShakeOutcome::FallbackCopy { reason } => warn!(
            bytes = report.bytes_written,
            "Copied {} unchanged: {}",
            input.display(),
            reason
        ),
    }

    for name in &report.removed {
        debug!(element = %name, "removed");
    }
}
