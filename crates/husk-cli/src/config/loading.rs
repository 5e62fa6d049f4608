use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use husk_shaker::ShakerConfig;
use std::path::Path;
use tracing::debug;

use crate::config::CliOverrides;
use crate::error::{ConfigError, Result};

/// Config file picked up from the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "husk.toml";

/// Prefix of environment variables that override config file values
/// (`HUSK_ENTRY_MARKER`, `HUSK_INHERITS_MARKER`, `HUSK_SOURCE_KIND`).
pub const ENV_PREFIX: &str = "HUSK_";

const ENV_KEYS: [&str; 3] = ["entry_marker", "inherits_marker", "source_kind"];

/// Load the shaker configuration from every source.
///
/// `config_path` is an explicit `--config` argument; without it,
/// [`CONFIG_FILE_NAME`] is read from `cwd` if present. Files ending in
/// `.json` are read as JSON, anything else as TOML.
///
/// # Errors
///
/// Fails when an explicit config file is missing, when a source cannot be
/// parsed, or when the merged markers are invalid.
pub fn load(config_path: Option<&Path>, cwd: &Path, overrides: &CliOverrides) -> Result<ShakerConfig> {
    let mut figment = Figment::new().merge(Serialized::defaults(ShakerConfig::default()));

    let config_file = match config_path {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                return Err(ConfigError::NotFound(path).into());
            }
            Some(path)
        }
        None => {
            let default_path = cwd.join(CONFIG_FILE_NAME);
            default_path.is_file().then_some(default_path)
        }
    };

    if let Some(path) = config_file {
        debug!(path = %path.display(), "loading config file");
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        figment = if is_json {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };
    }

    figment = figment
        .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS))
        .merge(Serialized::defaults(overrides));

    let config: ShakerConfig = figment.extract().map_err(ConfigError::from)?;
    config
        .validate()
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;
    Ok(config)
}
