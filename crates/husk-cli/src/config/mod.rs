//! Configuration system for Husk with multi-source loading.
//!
//! Merges shaker settings from CLI args, environment variables, and config
//! files. Priority: CLI > Environment > File > Defaults

mod loading;

use husk_shaker::SourceKind;
use serde::Serialize;

use crate::cli::Cli;

pub use loading::{CONFIG_FILE_NAME, ENV_PREFIX, load};

/// Shaker settings given as command-line flags.
///
/// Fields left `None` are not serialized, so they do not override lower
/// layers when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_marker: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits_marker: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<SourceKind>,
}

impl CliOverrides {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            entry_marker: cli.entry_marker.clone(),
            inherits_marker: cli.inherits_marker.clone(),
            // `--module` can only switch to module parsing; absence defers to
            // the config file.
            source_kind: cli.module.then_some(SourceKind::Module),
        }
    }
}
