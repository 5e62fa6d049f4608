//! Error types for shaking runs.
//!
//! Parse failures are deliberately absent: malformed input is recovered by
//! copying it verbatim (see [`ShakeOutcome::FallbackCopy`]). Only I/O and
//! configuration problems reach the caller.
//!
//! [`ShakeOutcome::FallbackCopy`]: crate::ShakeOutcome::FallbackCopy

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for shaker operations.
pub type Result<T> = std::result::Result<T, ShakeError>;

/// Phases of a single shaking run.
///
/// `Parsing → Indexing → Traversing → Reconstructing → Done`, with
/// `FallbackCopy` reachable only from `Parsing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakePhase {
    Parsing,
    Indexing,
    Traversing,
    Reconstructing,
    FallbackCopy,
    Done,
}

impl ShakePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShakePhase::Parsing => "parsing",
            ShakePhase::Indexing => "indexing",
            ShakePhase::Traversing => "traversing",
            ShakePhase::Reconstructing => "reconstructing",
            ShakePhase::FallbackCopy => "fallback-copy",
            ShakePhase::Done => "done",
        }
    }
}

impl fmt::Display for ShakePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a shaking run.
#[derive(Debug, Error)]
pub enum ShakeError {
    /// Reading the input or writing the output failed.
    #[error("I/O error while {phase}: {source}")]
    Io {
        phase: ShakePhase,
        #[source]
        source: std::io::Error,
    },

    /// The input re-read for reconstruction differs from the parsed input.
    ///
    /// Byte offsets recorded during parsing would no longer line up, so
    /// nothing is written.
    #[error("input changed between parsing and reconstruction ({parsed} bytes parsed, {reread} bytes re-read)")]
    SourceMismatch { parsed: usize, reread: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ShakeError {
    pub(crate) fn io(phase: ShakePhase) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ShakeError::Io { phase, source }
    }

    /// The phase an I/O failure happened in, if this is an I/O failure.
    pub fn phase(&self) -> Option<ShakePhase> {
        match self {
            ShakeError::Io { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_phase() {
        let err = ShakeError::io(ShakePhase::Reconstructing)(std::io::Error::other("disk full"));
        assert_eq!(err.phase(), Some(ShakePhase::Reconstructing));
        assert_eq!(err.to_string(), "I/O error while reconstructing: disk full");
    }

    #[test]
    fn phase_display() {
        assert_eq!(ShakePhase::FallbackCopy.to_string(), "fallback-copy");
        assert_eq!(ShakePhase::Parsing.to_string(), "parsing");
    }

    #[test]
    fn non_io_errors_have_no_phase() {
        let err = ShakeError::SourceMismatch {
            parsed: 3,
            reread: 4,
        };
        assert!(err.phase().is_none());
        assert!(err.to_string().contains("3 bytes parsed"));
    }
}
