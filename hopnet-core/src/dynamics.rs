//! Synchronous Hopfield dynamics: local fields, the sign rule, energy, and
//! the update-to-fixed-point loop.
//!
//! One update step computes every neuron's local field from a snapshot of
//! the state taken before the step begins, then applies the sign rule to
//! all neurons at once. Convergence is a state that reproduces itself;
//! synchronous updates can also fall into a period-2 cycle, which the loop
//! detects by comparing against the state two steps back. Energy is a
//! diagnostic, not a convergence criterion: it is not monotone under
//! synchronous updates.

use crate::error::{HopError, HopResult};
use crate::pattern::Pattern;
use crate::weights::PackedSymMatrix;

// ---------------------------------------------------------------------------
// Pure functions
// ---------------------------------------------------------------------------

/// The sign rule: `+1` for `x >= 0`, `-1` otherwise.
///
/// `sign(0) = +1` by convention; the test fixtures rely on it.
#[inline]
pub fn sign(x: f64) -> i8 {
    if x >= 0.0 {
        1
    } else {
        -1
    }
}

/// Local field of neuron `i` (1-based):
/// `h_i(s) = Σ_j W[i, j] * s[j]`.
///
/// `at` returns zero on the diagonal, so the self-term is inert.
pub fn local_field(weights: &PackedSymMatrix, state: &[i8], i: usize) -> f64 {
    assert_eq!(state.len(), weights.neurons());

    let mut field = 0.0;
    for j in 1..=state.len() {
        field += weights.at(i, j) * f64::from(state[j - 1]);
    }
    field
}

/// One synchronous update: a fresh vector with `s'[i] = sign(h_i(s))` for
/// every `i`, computed from the passed-in state snapshot.
pub fn synchronous_step(weights: &PackedSymMatrix, state: &[i8]) -> Vec<i8> {
    (1..=state.len())
        .map(|i| sign(local_field(weights, state, i)))
        .collect()
}

/// Hopfield energy `E(s) = -(1/2) * Σ_i s[i] * h_i(s)`.
pub fn energy(weights: &PackedSymMatrix, state: &[i8]) -> f64 {
    let dot: f64 = (1..=state.len())
        .map(|i| f64::from(state[i - 1]) * local_field(weights, state, i))
        .sum();
    -0.5 * dot
}

/// How an update-to-fixed-point run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The state reproduced itself.
    FixedPoint { iterations: usize },
    /// The state reproduced the state two steps back: a period-2 limit
    /// cycle. The run stops on the earlier of the two cycle states.
    TwoCycle { iterations: usize },
}

impl Outcome {
    /// Iterations performed by the run, whichever way it ended.
    pub fn iterations(&self) -> usize {
        match *self {
            Outcome::FixedPoint { iterations } | Outcome::TwoCycle { iterations } => iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// The update session
// ---------------------------------------------------------------------------

/// Mutable state of one recall session: the loaded couplings, the current
/// state vector, and the iteration counter.
///
/// The session is reused across queries: `set_initial_state` installs a new
/// query and resets the counter; the couplings stay loaded.
#[derive(Clone, Debug)]
pub struct DynamicsState {
    weights: PackedSymMatrix,
    state: Vec<i8>,
    iterations: usize,
}

impl DynamicsState {
    /// Wrap a filled coupling matrix. The state starts empty; install a
    /// query with [`set_initial_state`](DynamicsState::set_initial_state).
    pub fn new(weights: PackedSymMatrix) -> Self {
        Self {
            weights,
            state: Vec::new(),
            iterations: 0,
        }
    }

    pub fn weights(&self) -> &PackedSymMatrix {
        &self.weights
    }

    /// Current state vector; empty until a query is installed.
    pub fn state(&self) -> &[i8] {
        &self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Copy `pattern` into the current state and reset the iteration
    /// counter. Fails with [`HopError::SizeMismatch`] unless the pattern
    /// length equals the matrix order.
    pub fn set_initial_state(&mut self, pattern: &Pattern) -> HopResult<()> {
        if pattern.len() != self.weights.neurons() {
            return Err(HopError::SizeMismatch {
                what: format!("initial state \"{}\"", pattern.name()),
                expected: self.weights.neurons(),
                actual: pattern.len(),
            });
        }
        self.state.clear();
        self.state.extend_from_slice(pattern.values());
        self.iterations = 0;
        Ok(())
    }

    /// Drop the current state and reset the counter, keeping the couplings.
    pub fn clear(&mut self) {
        self.state.clear();
        self.iterations = 0;
    }

    /// Energy of the current state.
    pub fn energy(&self) -> f64 {
        energy(&self.weights, &self.state)
    }

    /// One synchronous step. Returns `true` iff the state changed, i.e.
    /// the dynamics has not yet converged; a changed state increments the
    /// iteration counter.
    pub fn single_update(&mut self) -> bool {
        let next = synchronous_step(&self.weights, &self.state);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.iterations += 1;
        true
    }

    /// Iterate synchronous updates until the state reproduces itself, or
    /// until a period-2 cycle is detected by equality with the state two
    /// steps back.
    pub fn run_to_fixed_point(&mut self) -> Outcome {
        self.run_to_fixed_point_with(|_, _| {})
    }

    /// Like [`run_to_fixed_point`](DynamicsState::run_to_fixed_point), but
    /// calls `observe(iterations, energy)` after every completed step.
    pub fn run_to_fixed_point_with<F>(&mut self, mut observe: F) -> Outcome
    where
        F: FnMut(usize, f64),
    {
        let mut two_back: Vec<i8> = Vec::new();

        loop {
            let next = synchronous_step(&self.weights, &self.state);
            if next == self.state {
                return Outcome::FixedPoint {
                    iterations: self.iterations,
                };
            }
            if next == two_back {
                log::warn!(
                    "period-2 cycle after {} iterations; stopping",
                    self.iterations
                );
                return Outcome::TwoCycle {
                    iterations: self.iterations,
                };
            }
            two_back = std::mem::replace(&mut self.state, next);
            self.iterations += 1;
            observe(self.iterations, self.energy());
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
