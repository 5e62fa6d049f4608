//! `husk analyze` command implementation.

use std::fs;
use std::path::Path;

use husk_shaker::{ShakerConfig, TreeShaker};
use tracing::info;

use crate::cli::AnalyzeArgs;
use crate::commands::utils::{resolve_path, validate_input, write_output};
use crate::error::{CliError, Result, ResultExt};

/// Execute the analyze command.
///
/// Prints the analysis as pretty JSON to stdout, or writes it to `--json`.
///
/// # Errors
///
/// Returns an error if the input is missing or not UTF-8, does not parse,
/// or the JSON cannot be written.
pub fn execute(args: &AnalyzeArgs, config: ShakerConfig, cwd: &Path) -> Result<()> {
    let input = resolve_path(&args.input, cwd);
    validate_input(&input)?;
    let source = fs::read_to_string(&input).with_path(&input)?;

    let shaker = TreeShaker::new(config)?;
    let analysis = shaker
        .analyze(&source)
        .ok_or_else(|| CliError::Unparsable(input.clone()))?;
    let json = analysis.to_json()?;

    match &args.json {
        Some(path) => {
            let path = resolve_path(path, cwd);
            write_output(&path, json.as_bytes())?;
            info!("Wrote analysis JSON to {}", path.display());
        }
        None => println!("{json}"),
    }

    info!(
        elements = analysis.elements.len(),
        reachable = analysis.reachable.len(),
        removable = analysis.unreachable().count(),
        "Analysis complete for {}",
        input.display()
    );
    Ok(())
}
