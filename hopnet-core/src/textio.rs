//! Whitespace-separated ASCII persistence shared by patterns and matrices.
//!
//! Both on-disk formats are a single line of tokens with no header: pattern
//! files hold literal `1`/`-1` integers, weight-matrix files hold decimal
//! doubles in strict-upper-triangular row-major order. Writers flush and
//! sync before returning, so a reader (or an emptiness check) that runs
//! immediately afterwards sees the finished file.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{HopError, HopResult};

fn io_err(path: &Path, source: std::io::Error) -> HopError {
    HopError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `values` to `path` as single-space-separated tokens.
///
/// The file handle is flushed and synced before this returns.
pub(crate) fn write_tokens<T, I>(path: &Path, values: I) -> HopResult<()>
where
    T: Display,
    I: IntoIterator<Item = T>,
{
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);

    let mut first = true;
    for value in values {
        if first {
            write!(out, "{value}").map_err(|e| io_err(path, e))?;
            first = false;
        } else {
            write!(out, " {value}").map_err(|e| io_err(path, e))?;
        }
    }

    out.flush().map_err(|e| io_err(path, e))?;
    out.into_inner()
        .map_err(|e| io_err(path, e.into_error()))?
        .sync_all()
        .map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Read every whitespace-separated token of `path`, parsing each as `T`.
///
/// A token that fails to parse is an [`HopError::InvalidValue`] naming the
/// file; token-count checks are the caller's job.
pub(crate) fn read_tokens<T: FromStr>(path: &Path, what: &str) -> HopResult<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;

    text.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                HopError::InvalidValue(format!(
                    "token \"{token}\" in \"{}\" is not a valid {what}",
                    path.display()
                ))
            })
        })
        .collect()
}
