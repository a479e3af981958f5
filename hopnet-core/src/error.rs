//! Error taxonomy shared by the whole engine.
//!
//! Five kinds cover every failure the pipeline can surface: disk trouble,
//! a declared size disagreeing with reality, a value outside the bipolar
//! alphabet, a directory that is not what a stage expects, and a plain bad
//! argument. Stages propagate these to their entry points; nothing retries.

use std::fmt;

/// Errors from pattern handling, coupling storage, and the recall pipeline.
#[derive(Debug)]
pub enum HopError {
    /// Open/read/write/sync failure on a disk path.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Declared size `N`/`M` disagrees with an on-disk token count or an
    /// in-memory length.
    SizeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },
    /// A pattern entry outside `{-1, +1}`, or a weight token that does not
    /// parse as a double.
    InvalidValue(String),
    /// Missing, non-directory, or wrong-contents directory.
    InvalidPath { path: String, reason: String },
    /// Probability outside `[0, 1]`, a cut window outside the grid, or an
    /// index outside `[1, N]`.
    InvalidArgument(String),
}

impl fmt::Display for HopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopError::Io { path, source } => write!(f, "file \"{path}\": {source}"),
            HopError::SizeMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected {expected} entries, found {actual}"),
            HopError::InvalidValue(what) => write!(f, "invalid value: {what}"),
            HopError::InvalidPath { path, reason } => write!(f, "path \"{path}\": {reason}"),
            HopError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
        }
    }
}

impl std::error::Error for HopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HopError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias used across both crates.
pub type HopResult<T> = Result<T, HopError>;
