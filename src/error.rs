use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building an [`AssessmentScheme`](crate::grading::AssessmentScheme)
/// from loosely-typed key/value input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemeError {
    #[error("unknown assessment key '{0}' (expected ca, ca1, ca2, ca3, ca4 or exam)")]
    UnknownKey(String),

    #[error("assessment key '{0}' given more than once")]
    DuplicateKey(String),

    #[error("malformed assessment entry '{entry}': {reason}")]
    Malformed { entry: String, reason: String },
}

/// Errors raised while reading result and mock files.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file version {version} in {}", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no files match '{0}'")]
    NoMatches(String),
}
