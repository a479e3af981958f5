//! Per-run directory layout, validation, and output clearing.
//!
//! Every pipeline stage works relative to one base directory:
//!
//! ```text
//! images/source_images/       input rasters
//! images/binarized_images/    regenerated binarized rasters
//! patterns/                   pattern files (*.txt only)
//! weight_matrix/              exactly weight_matrix.txt
//! corrupted_files/            noisy and cut pattern files + rasters
//! ```
//!
//! Input directories are validated strictly; output directories are created
//! if absent and cleared recursively on stage startup. There is no
//! process-wide directory state: every call site gets its directory from a
//! `Workdir` value.

use std::fs;
use std::path::{Path, PathBuf};

use hopnet_core::{HopError, HopResult};

/// Only file permitted inside the weight-matrix directory.
pub const WEIGHT_MATRIX_FILE: &str = "weight_matrix.txt";

fn io_err(path: &Path, source: std::io::Error) -> HopError {
    HopError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn path_err(path: &Path, reason: impl Into<String>) -> HopError {
    HopError::InvalidPath {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// The directory layout of one engine run.
#[derive(Clone, Debug)]
pub struct Workdir {
    base: PathBuf,
}

impl Workdir {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn source_images_dir(&self) -> PathBuf {
        self.base.join("images").join("source_images")
    }

    pub fn binarized_images_dir(&self) -> PathBuf {
        self.base.join("images").join("binarized_images")
    }

    pub fn patterns_dir(&self) -> PathBuf {
        self.base.join("patterns")
    }

    pub fn weight_matrix_dir(&self) -> PathBuf {
        self.base.join("weight_matrix")
    }

    pub fn corrupted_dir(&self) -> PathBuf {
        self.base.join("corrupted_files")
    }

    // -----------------------------------------------------------------------
    // Input validation
    // -----------------------------------------------------------------------

    /// An input directory must exist, be a directory, and be non-empty.
    pub fn validate_input_dir(path: &Path) -> HopResult<()> {
        if !path.exists() {
            return Err(path_err(path, "not found"));
        }
        if !path.is_dir() {
            return Err(path_err(path, "is not a directory"));
        }
        let mut entries = fs::read_dir(path).map_err(|e| io_err(path, e))?;
        if entries.next().is_none() {
            return Err(path_err(path, "is empty"));
        }
        Ok(())
    }

    /// The patterns directory must contain only regular `*.txt` files.
    pub fn validate_patterns_dir(&self) -> HopResult<()> {
        let dir = self.patterns_dir();
        Self::validate_input_dir(&dir)?;

        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                return Err(path_err(&path, "is not a regular file"));
            }
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                return Err(path_err(&path, "has an invalid extension"));
            }
        }
        Ok(())
    }

    /// The weight-matrix directory must contain only `weight_matrix.txt`.
    pub fn validate_weight_matrix_dir(&self) -> HopResult<()> {
        let dir = self.weight_matrix_dir();
        Self::validate_input_dir(&dir)?;

        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                return Err(path_err(&path, "is not a regular file"));
            }
            if entry.file_name() != WEIGHT_MATRIX_FILE {
                return Err(path_err(
                    &path,
                    format!("only \"{WEIGHT_MATRIX_FILE}\" may be present"),
                ));
            }
        }
        Ok(())
    }

    /// Sorted file names of every pattern in the patterns directory.
    ///
    /// Directory order is irrelevant to the Hebbian sum; sorting just makes
    /// runs reproducible byte-for-byte.
    pub fn pattern_files(&self) -> HopResult<Vec<String>> {
        self.validate_patterns_dir()?;
        let dir = self.patterns_dir();

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    // -----------------------------------------------------------------------
    // Output preparation
    // -----------------------------------------------------------------------

    /// Create `path` if absent, then remove everything inside it.
    pub fn prepare_output_dir(path: &Path) -> HopResult<()> {
        fs::create_dir_all(path).map_err(|e| io_err(path, e))?;
        if !path.is_dir() {
            return Err(path_err(path, "is not a directory"));
        }

        for entry in fs::read_dir(path).map_err(|e| io_err(path, e))? {
            let entry = entry.map_err(|e| io_err(path, e))?;
            let child = entry.path();
            if child.is_dir() {
                fs::remove_dir_all(&child).map_err(|e| io_err(&child, e))?;
            } else {
                fs::remove_file(&child).map_err(|e| io_err(&child, e))?;
            }
        }
        Ok(())
    }
}
