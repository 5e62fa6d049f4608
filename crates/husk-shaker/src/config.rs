//! Shaker configuration.
//!
//! The two marker names are the only knobs that change what the indexer
//! recognizes. Everything else about a run is derived from the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, ShakeError};
use oxc_span::SourceType;

/// Default name of the entry-point marker function.
pub const DEFAULT_ENTRY_MARKER: &str = "RunEntry";

/// Default name of the inheritance marker function.
pub const DEFAULT_INHERITS_MARKER: &str = "$inherits";

/// How the input text is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Classic script (generated output is a flat script).
    #[default]
    Script,
    /// ECMAScript module.
    Module,
}

impl SourceKind {
    pub(crate) fn to_oxc(self) -> SourceType {
        match self {
            SourceKind::Script => SourceType::cjs(),
            SourceKind::Module => SourceType::mjs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShakerConfig {
    /// Top-level calls to this function are entry points.
    #[serde(default = "default_entry_marker")]
    pub entry_marker: String,

    /// Top-level `marker(Sub, Super)` calls declare inheritance.
    #[serde(default = "default_inherits_marker")]
    pub inherits_marker: String,

    #[serde(default)]
    pub source_kind: SourceKind,
}

fn default_entry_marker() -> String {
    DEFAULT_ENTRY_MARKER.to_string()
}

fn default_inherits_marker() -> String {
    DEFAULT_INHERITS_MARKER.to_string()
}

impl Default for ShakerConfig {
    fn default() -> Self {
        Self {
            entry_marker: default_entry_marker(),
            inherits_marker: default_inherits_marker(),
            source_kind: SourceKind::default(),
        }
    }
}

impl ShakerConfig {
    pub fn with_entry_marker(mut self, name: impl Into<String>) -> Self {
        self.entry_marker = name.into();
        self
    }

    pub fn with_inherits_marker(mut self, name: impl Into<String>) -> Self {
        self.inherits_marker = name.into();
        self
    }

    pub fn with_source_kind(mut self, kind: SourceKind) -> Self {
        self.source_kind = kind;
        self
    }

    /// Check that both markers are usable identifiers and do not collide.
    ///
    /// # Errors
    ///
    /// Returns [`ShakeError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("entry_marker", &self.entry_marker),
            ("inherits_marker", &self.inherits_marker),
        ] {
            if let Err(reason) = check_identifier(value) {
                return Err(ShakeError::InvalidConfig(format!(
                    "{field} must be a JavaScript identifier, got {value:?} ({reason})"
                )));
            }
        }

        if self.entry_marker == self.inherits_marker {
            return Err(ShakeError::InvalidConfig(format!(
                "entry_marker and inherits_marker must differ (both are {:?})",
                self.entry_marker
            )));
        }

        Ok(())
    }
}

/// Why a name cannot be used as a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("name is empty")]
    Empty,
    #[error("name starts with '{0}'")]
    InvalidStart(char),
    #[error("name contains '{0}'")]
    InvalidChar(char),
}

/// Check that `name` is a plain JavaScript identifier: a letter, `_` or `$`
/// followed by letters, digits, `_` or `$`.
///
/// # Errors
///
/// Returns the first rule `name` breaks.
pub fn check_identifier(name: &str) -> std::result::Result<(), IdentifierError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(IdentifierError::Empty)?;
    if !(first == '$' || first == '_' || first.is_alphabetic()) {
        return Err(IdentifierError::InvalidStart(first));
    }
    match chars.find(|c| !(*c == '$' || *c == '_' || c.is_alphanumeric())) {
        Some(c) => Err(IdentifierError::InvalidChar(c)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generator_markers() {
        let config = ShakerConfig::default();
        assert_eq!(config.entry_marker, "RunEntry");
        assert_eq!(config.inherits_marker, "$inherits");
        assert_eq!(config.source_kind, SourceKind::Script);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ShakerConfig =
            serde_json::from_str(r#"{ "entry_marker": "main$entry" }"#).unwrap();
        assert_eq!(config.entry_marker, "main$entry");
        assert_eq!(config.inherits_marker, "$inherits");
    }

    #[test]
    fn source_kind_deserializes_lowercase() {
        let config: ShakerConfig = serde_json::from_str(r#"{ "source_kind": "module" }"#).unwrap();
        assert_eq!(config.source_kind, SourceKind::Module);
    }

    #[test]
    fn rejects_non_identifier_markers() {
        let config = ShakerConfig::default().with_entry_marker("Run Entry");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entry_marker"));

        let config = ShakerConfig::default().with_inherits_marker("");
        assert!(config.validate().is_err());

        let config = ShakerConfig::default().with_inherits_marker("1up");
        assert!(config.validate().is_err());
    }

    #[test]
    fn check_identifier_reports_first_broken_rule() {
        assert_eq!(check_identifier("$inherits"), Ok(()));
        assert_eq!(check_identifier("main$1"), Ok(()));
        assert_eq!(check_identifier(""), Err(IdentifierError::Empty));
        assert_eq!(check_identifier("1up"), Err(IdentifierError::InvalidStart('1')));
        assert_eq!(check_identifier("ns.run"), Err(IdentifierError::InvalidChar('.')));
    }

    #[test]
    fn rejects_identical_markers() {
        let config = ShakerConfig::default()
            .with_entry_marker("go")
            .with_inherits_marker("go");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }
}
