//! Bipolar pattern vectors and the corruption operators used to build
//! recall queries.
//!
//! A [`Pattern`] is an ordered sequence of ±1 values. The two-dimensional
//! reading of a pattern (width, height, row-major) is carried by the
//! callers; the pattern itself is a flat vector plus the file name it is
//! persisted under. Entries are `i8` and every constructor and mutator
//! keeps the bipolar invariant: a stored value is always `-1` or `+1`.

use std::path::Path;

use rand::Rng;

use crate::error::{HopError, HopResult};
use crate::textio;

/// A named bipolar vector.
///
/// Fresh patterns are empty; values are appended one at a time until the
/// declared length is reached. A pattern is either empty or full — partial
/// states exist only while a builder is appending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    name: String,
    values: Vec<i8>,
}

impl Pattern {
    /// Create an empty pattern that will persist under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Build a pattern from existing values, validating bipolarity.
    pub fn from_values(name: impl Into<String>, values: Vec<i8>) -> HopResult<Self> {
        let mut pattern = Self::new(name);
        for &v in &values {
            pattern.check_bipolar(v)?;
        }
        pattern.values = values;
        Ok(pattern)
    }

    /// File name (with extension) this pattern persists under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of this pattern that persists under a different name, used to
    /// derive corrupted and recovered siblings of a reference pattern.
    pub fn renamed(&self, name: impl Into<String>) -> Pattern {
        Pattern {
            name: name.into(),
            values: self.values.clone(),
        }
    }

    /// File name without its extension, used to derive sibling file names
    /// (`ae.txt` → `ae`).
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[..dot],
            None => &self.name,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the bipolar vector.
    pub fn values(&self) -> &[i8] {
        &self.values
    }

    fn check_bipolar(&self, value: i8) -> HopResult<()> {
        if value == 1 || value == -1 {
            Ok(())
        } else {
            Err(HopError::InvalidValue(format!(
                "pattern \"{}\" entry {value}; entries must be +1 or -1",
                self.name
            )))
        }
    }

    fn check_len(&self, expected: usize) -> HopResult<()> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(HopError::SizeMismatch {
                what: format!("pattern \"{}\"", self.name),
                expected,
                actual: self.values.len(),
            })
        }
    }

    /// Append one value. Fails with [`HopError::InvalidValue`] unless the
    /// value is `-1` or `+1`.
    pub fn push(&mut self, value: i8) -> HopResult<()> {
        self.check_bipolar(value)?;
        self.values.push(value);
        Ok(())
    }

    /// Number of positions where `self` and `other` disagree.
    ///
    /// Both patterns must be full and the same length.
    pub fn hamming_distance(&self, other: &Pattern) -> usize {
        assert_eq!(self.len(), other.len());
        self.values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    // -----------------------------------------------------------------------
    // Corruption operators
    // -----------------------------------------------------------------------

    /// Flip each entry independently with probability `probability`.
    ///
    /// `neurons` re-states the expected length; the call fails with
    /// [`HopError::SizeMismatch`] if the pattern is not exactly that long,
    /// and with [`HopError::InvalidArgument`] if the probability is outside
    /// `[0, 1]`. Length and bipolarity are preserved.
    pub fn add_noise(
        &mut self,
        probability: f64,
        neurons: usize,
        rng: &mut impl Rng,
    ) -> HopResult<()> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(HopError::InvalidArgument(format!(
                "noise probability {probability} outside [0, 1]"
            )));
        }
        self.check_len(neurons)?;

        for value in self.values.iter_mut() {
            if rng.gen_bool(probability) {
                *value = -*value;
            }
        }
        Ok(())
    }

    /// Fill the rectangular window `rows × cols` (1-based, inclusive) with
    /// `value`, interpreting the pattern as a `width × height` row-major
    /// grid.
    ///
    /// Fails with [`HopError::InvalidValue`] for a non-bipolar fill value,
    /// [`HopError::SizeMismatch`] unless `len() == width * height`, and
    /// [`HopError::InvalidArgument`] for an empty or out-of-grid window.
    pub fn cut(
        &mut self,
        value: i8,
        rows: (usize, usize),
        cols: (usize, usize),
        width: usize,
        height: usize,
    ) -> HopResult<()> {
        self.check_bipolar(value)?;
        self.check_len(width * height)?;

        let (from_row, to_row) = rows;
        let (from_col, to_col) = cols;
        if from_row < 1 || from_row > to_row || to_row > height {
            return Err(HopError::InvalidArgument(format!(
                "cut rows [{from_row}, {to_row}] outside [1, {height}]"
            )));
        }
        if from_col < 1 || from_col > to_col || to_col > width {
            return Err(HopError::InvalidArgument(format!(
                "cut cols [{from_col}, {to_col}] outside [1, {width}]"
            )));
        }

        for y in from_row..=to_row {
            for x in from_col..=to_col {
                self.values[(y - 1) * width + (x - 1)] = value;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the pattern to `dir/<name>` as space-separated `1`/`-1` tokens.
    pub fn save(&self, dir: &Path) -> HopResult<()> {
        textio::write_tokens(&dir.join(&self.name), self.values.iter())
    }

    /// Load `dir/<name>`, requiring exactly `neurons` bipolar tokens.
    ///
    /// An empty file is legal only for `neurons == 0`.
    pub fn load(dir: &Path, name: &str, neurons: usize) -> HopResult<Pattern> {
        let path = dir.join(name);
        let tokens: Vec<i8> = textio::read_tokens(&path, "bipolar entry")?;

        let mut pattern = Pattern::new(name);
        for v in tokens {
            pattern.push(v).map_err(|_| {
                HopError::InvalidValue(format!(
                    "entry {v} in \"{}\"; entries must be +1 or -1",
                    path.display()
                ))
            })?;
        }
        pattern.check_len(neurons)?;
        Ok(pattern)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
