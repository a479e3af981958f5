//! Packed symmetric coupling matrix with null diagonal, and its Hebbian
//! construction.
//!
//! An order-`N` coupling matrix is symmetric with `W[i,i] = 0`, so only the
//! strict upper triangle is stored: a flat buffer of
//! `M = N * (N - 1) / 2` doubles in row-major order
//! `W[1,2], W[1,3], …, W[1,N], W[2,3], …, W[N-1,N]`. This halves memory for
//! the 4096-neuron case and keeps symmetric access O(1); the cost is the
//! offset arithmetic below.
//!
//! Indices are 1-based throughout, matching the packed-offset formula.

use std::path::Path;

use crate::error::{HopError, HopResult};
use crate::pattern::Pattern;
use crate::textio;

// ---------------------------------------------------------------------------
// Packed-triangle index arithmetic
// ---------------------------------------------------------------------------

/// Packed offset of the off-diagonal element `(i, j)` of an order-`n`
/// symmetric matrix, 1-based.
///
/// Row `i` of the strict upper triangle starts after
/// `(i - 1) * (2n - i) / 2` entries and holds `n - i` of them, so for
/// `i < j`:
///
/// ```text
/// offset(i, j, n) = (i - 1) * (2n - i) / 2 + (j - i - 1)
/// ```
///
/// Arguments are symmetric: `offset(j, i, n) == offset(i, j, n)`. The
/// diagonal is not stored; callers must not pass `i == j`.
pub fn packed_offset(i: usize, j: usize, n: usize) -> usize {
    assert!(i >= 1 && i <= n, "row index {i} outside [1, {n}]");
    assert!(j >= 1 && j <= n, "column index {j} outside [1, {n}]");
    assert_ne!(i, j, "the diagonal is not stored");

    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    (lo - 1) * (2 * n - lo) / 2 + (hi - lo - 1)
}

/// Successor of `(i, j)` in row-major traversal of the strict upper
/// triangle of an order-`n` matrix.
///
/// From a valid pair with `1 <= i <= n - 1`, `i + 1 <= j <= n`, this yields
/// `(i, j + 1)` within the row, `(i + 1, i + 2)` at a row boundary, and the
/// terminal state `(n, n + 1)` after the last element.
pub fn advance(i: usize, j: usize, n: usize) -> (usize, usize) {
    assert!(i >= 1 && i < n, "row index {i} outside [1, {}]", n - 1);
    assert!(j > i && j <= n, "column index {j} outside [{}, {n}]", i + 1);

    if j < n {
        (i, j + 1)
    } else if i + 1 < n {
        (i + 1, i + 2)
    } else {
        (n, n + 1)
    }
}

// ---------------------------------------------------------------------------
// The matrix
// ---------------------------------------------------------------------------

/// Symmetric coupling matrix of a Hopfield network, packed.
///
/// A fresh matrix has an empty buffer; [`fill`](PackedSymMatrix::fill) (or
/// [`load`](PackedSymMatrix::load)) brings it to exactly
/// `neurons * (neurons - 1) / 2` weights.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedSymMatrix {
    neurons: usize,
    weights: Vec<f64>,
}

impl PackedSymMatrix {
    /// Create an empty matrix of order `neurons`.
    pub fn new(neurons: usize) -> Self {
        Self {
            neurons,
            weights: Vec::new(),
        }
    }

    pub fn neurons(&self) -> usize {
        self.neurons
    }

    /// Packed buffer length after a successful fill or load.
    pub fn packed_len(&self) -> usize {
        self.neurons * self.neurons.saturating_sub(1) / 2
    }

    /// Read-only view of the packed strict-upper-triangular buffer.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Coupling `W[i, j]`, 1-based: zero on the diagonal, packed lookup
    /// otherwise. The matrix must be filled.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        if i == j {
            assert!(i >= 1 && i <= self.neurons);
            return 0.0;
        }
        self.weights[packed_offset(i, j, self.neurons)]
    }

    /// Hebbian coupling of neurons `i < j` over a pattern set:
    /// `(1/N) * Σ_p p[i] * p[j]`.
    fn hebbian_weight(&self, i: usize, j: usize, patterns: &[Pattern]) -> f64 {
        let sum: i64 = patterns
            .iter()
            .map(|p| i64::from(p.values()[i - 1]) * i64::from(p.values()[j - 1]))
            .sum();
        sum as f64 / self.neurons as f64
    }

    /// Hebbian fill from a pattern set.
    ///
    /// Clears the buffer, then generates exactly `M` weights in row-major
    /// traversal order. Every pattern must be bipolar and exactly `neurons`
    /// long; validation happens before any weight is produced, so a failed
    /// fill leaves the matrix empty.
    pub fn fill(&mut self, patterns: &[Pattern]) -> HopResult<()> {
        for p in patterns {
            if p.len() != self.neurons {
                return Err(HopError::SizeMismatch {
                    what: format!("pattern \"{}\"", p.name()),
                    expected: self.neurons,
                    actual: p.len(),
                });
            }
            if let Some(&bad) = p.values().iter().find(|&&v| v != 1 && v != -1) {
                return Err(HopError::InvalidValue(format!(
                    "pattern \"{}\" entry {bad}; entries must be +1 or -1",
                    p.name()
                )));
            }
        }

        self.weights.clear();
        let m = self.packed_len();
        self.weights.reserve_exact(m);

        let (mut i, mut j) = (1, 2);
        for _ in 0..m {
            let weight = self.hebbian_weight(i, j, patterns);
            self.weights.push(weight);
            (i, j) = advance(i, j, self.neurons);
        }

        if m > 0 {
            debug_assert_eq!((i, j), (self.neurons, self.neurons + 1));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the packed buffer to `dir/<name>` as space-separated decimal
    /// doubles in traversal order.
    ///
    /// The matrix must be filled; for `neurons <= 1` the buffer (and hence
    /// the file) is legitimately empty.
    pub fn save(&self, dir: &Path, name: &str) -> HopResult<()> {
        if self.weights.len() != self.packed_len() {
            return Err(HopError::SizeMismatch {
                what: format!("weight matrix \"{name}\""),
                expected: self.packed_len(),
                actual: self.weights.len(),
            });
        }
        textio::write_tokens(&dir.join(name), self.weights.iter())
    }

    /// Load `dir/<name>` into a fresh matrix of order `neurons`, requiring
    /// exactly `M` weight tokens. An empty file is legal only when
    /// `neurons` is 0 or 1.
    pub fn load(dir: &Path, name: &str, neurons: usize) -> HopResult<PackedSymMatrix> {
        let path = dir.join(name);
        let weights: Vec<f64> = textio::read_tokens(&path, "weight")?;

        let mut matrix = PackedSymMatrix::new(neurons);
        if weights.len() != matrix.packed_len() {
            return Err(HopError::SizeMismatch {
                what: format!("weight matrix \"{}\"", path.display()),
                expected: matrix.packed_len(),
                actual: weights.len(),
            });
        }
        matrix.weights = weights;
        Ok(matrix)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
