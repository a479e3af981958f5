//! Recall stage: corrupt a stored pattern and run the synchronous dynamics
//! back to a fixed point.
//!
//! A recall session moves through the phases
//! `Idle → Loaded → Queried → Iterating → Converged` and back to `Loaded`
//! after the recovered state is saved (or the query cleared). Corruption is
//! the only randomized step; the dynamics itself is deterministic given the
//! initial state and the couplings.

use std::path::Path;

use rand::Rng;

use hopnet_core::{DynamicsState, HopError, HopResult, Outcome, PackedSymMatrix, Pattern};

use crate::config::EngineConfig;
use crate::raster;
use crate::workdir::{Workdir, WEIGHT_MATRIX_FILE};

/// Lifecycle of a recall session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; no couplings loaded yet.
    Idle,
    /// Couplings loaded; no query prepared.
    Loaded,
    /// Corrupted copies of a reference pattern exist.
    Queried,
    /// An initial state is installed and updates may run.
    Iterating,
    /// The dynamics reached a fixed point (or a detected 2-cycle).
    Converged,
}

/// Which corrupted copy seeds the dynamics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    /// The sign-noise copy (`<stem>.noise.txt`).
    Noisy,
    /// The rectangularly occluded copy (`<stem>.cut.txt`).
    Cut,
}

/// The recall stage of one run.
pub struct Recall {
    workdir: Workdir,
    config: EngineConfig,
    dynamics: Option<DynamicsState>,
    reference: Option<Pattern>,
    noisy: Option<Pattern>,
    cut: Option<Pattern>,
    current: Option<Query>,
    phase: Phase,
}

impl Recall {
    /// Validate the weight-matrix and patterns directories and prepare
    /// (create + clear) the corrupted-files directory.
    pub fn new(workdir: Workdir, config: EngineConfig) -> HopResult<Self> {
        workdir.validate_weight_matrix_dir()?;
        workdir.validate_patterns_dir()?;
        Workdir::prepare_output_dir(&workdir.corrupted_dir())?;

        Ok(Self {
            workdir,
            config,
            dynamics: None,
            reference: None,
            noisy: None,
            cut: None,
            current: None,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The reference pattern of the current query, if one is prepared.
    pub fn reference(&self) -> Option<&Pattern> {
        self.reference.as_ref()
    }

    pub fn noisy(&self) -> Option<&Pattern> {
        self.noisy.as_ref()
    }

    pub fn cut_copy(&self) -> Option<&Pattern> {
        self.cut.as_ref()
    }

    /// Current state vector of the dynamics; empty until a query is
    /// installed.
    pub fn state(&self) -> &[i8] {
        self.dynamics.as_ref().map_or(&[], |d| d.state())
    }

    pub fn iterations(&self) -> usize {
        self.dynamics.as_ref().map_or(0, |d| d.iterations())
    }

    fn dynamics_mut(&mut self) -> HopResult<&mut DynamicsState> {
        self.dynamics
            .as_mut()
            .ok_or_else(|| HopError::InvalidArgument("no weight matrix loaded".to_string()))
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    /// Load `weight_matrix/weight_matrix.txt` for the configured grid.
    pub fn load_weight_matrix(&mut self) -> HopResult<()> {
        let matrix = PackedSymMatrix::load(
            &self.workdir.weight_matrix_dir(),
            WEIGHT_MATRIX_FILE,
            self.config.grid.neurons(),
        )?;
        self.dynamics = Some(DynamicsState::new(matrix));
        self.phase = Phase::Loaded;
        Ok(())
    }

    /// Load the reference pattern `name` and produce its two corrupted
    /// copies: a noisy one (independent sign flips) and a cut one
    /// (rectangular occlusion). Both are persisted under
    /// `corrupted_files/<stem>.noise.txt` / `<stem>.cut.txt` and rendered
    /// to PNG next to the text files.
    pub fn corrupt_pattern(&mut self, name: &str, rng: &mut impl Rng) -> HopResult<()> {
        if self.dynamics.is_none() {
            return Err(HopError::InvalidArgument(
                "no weight matrix loaded".to_string(),
            ));
        }
        let grid = self.config.grid;
        let corruption = self.config.corruption;
        let reference = Pattern::load(&self.workdir.patterns_dir(), name, grid.neurons())?;

        let mut noisy = reference.renamed(format!("{}.noise.txt", reference.stem()));
        noisy.add_noise(corruption.noise_probability, grid.neurons(), rng)?;

        let mut cut = reference.renamed(format!("{}.cut.txt", reference.stem()));
        cut.cut(
            corruption.cut_value,
            corruption.cut_rows,
            corruption.cut_cols,
            grid.width,
            grid.height,
        )?;

        let corrupted_dir = self.workdir.corrupted_dir();
        for copy in [&noisy, &cut] {
            copy.save(&corrupted_dir)?;
            raster::render_to_png(copy, &corrupted_dir, &grid)?;
        }

        self.reference = Some(reference);
        self.noisy = Some(noisy);
        self.cut = Some(cut);
        self.current = None;
        if let Some(dynamics) = self.dynamics.as_mut() {
            dynamics.clear();
        }
        self.phase = Phase::Queried;
        Ok(())
    }

    /// Corrupt every pattern in the patterns directory. The copies of the
    /// last name (in sorted order) stay current. Returns the names.
    pub fn corrupt_all(&mut self, rng: &mut impl Rng) -> HopResult<Vec<String>> {
        let names = self.workdir.pattern_files()?;
        for name in &names {
            self.corrupt_pattern(name, rng)?;
        }
        Ok(names)
    }

    /// Copy the chosen corrupted pattern into the dynamics state and reset
    /// the iteration counter.
    pub fn set_initial_state(&mut self, query: Query) -> HopResult<()> {
        let pattern = match query {
            Query::Noisy => self.noisy.clone(),
            Query::Cut => self.cut.clone(),
        }
        .ok_or_else(|| HopError::InvalidArgument("no corrupted query prepared".to_string()))?;

        self.dynamics_mut()?.set_initial_state(&pattern)?;
        self.current = Some(query);
        self.phase = Phase::Iterating;
        Ok(())
    }

    /// One synchronous step; `true` iff the state changed (not converged).
    pub fn single_update(&mut self) -> HopResult<bool> {
        if self.current.is_none() {
            return Err(HopError::InvalidArgument(
                "no initial state installed".to_string(),
            ));
        }
        let changed = self.dynamics_mut()?.single_update();
        self.phase = if changed {
            Phase::Iterating
        } else {
            Phase::Converged
        };
        Ok(changed)
    }

    /// Run to a fixed point (or detected 2-cycle).
    pub fn run_to_fixed_point(&mut self) -> HopResult<Outcome> {
        self.run_to_fixed_point_with(|_, _| {})
    }

    /// Like [`run_to_fixed_point`](Recall::run_to_fixed_point), calling
    /// `observe(iterations, energy)` after every completed step.
    pub fn run_to_fixed_point_with<F>(&mut self, observe: F) -> HopResult<Outcome>
    where
        F: FnMut(usize, f64),
    {
        if self.current.is_none() {
            return Err(HopError::InvalidArgument(
                "no initial state installed".to_string(),
            ));
        }
        let outcome = self.dynamics_mut()?.run_to_fixed_point_with(observe);
        self.phase = Phase::Converged;
        Ok(outcome)
    }

    /// Energy of the current state.
    pub fn energy(&self) -> Option<f64> {
        self.dynamics
            .as_ref()
            .filter(|d| !d.state().is_empty())
            .map(|d| d.energy())
    }

    /// Hamming distance between the current state and the reference
    /// pattern, if both exist.
    pub fn hamming_to_reference(&self) -> Option<usize> {
        let reference = self.reference.as_ref()?;
        let state = self.state();
        if state.len() != reference.len() {
            return None;
        }
        Some(
            state
                .iter()
                .zip(reference.values().iter())
                .filter(|(a, b)| a != b)
                .count(),
        )
    }

    /// Persist the converged state under
    /// `corrupted_files/<query stem>.recovered.txt`, render it, and return
    /// the saved file name. The session drops back to `Loaded` with the
    /// query copies retained.
    pub fn save_current_state(&mut self) -> HopResult<String> {
        if self.phase != Phase::Converged {
            return Err(HopError::InvalidArgument(
                "dynamics has not converged".to_string(),
            ));
        }
        let query = match self.current {
            Some(Query::Noisy) => self.noisy.as_ref(),
            Some(Query::Cut) => self.cut.as_ref(),
            None => None,
        }
        .ok_or_else(|| HopError::InvalidArgument("no corrupted query prepared".to_string()))?;

        let name = format!("{}.recovered.txt", query.stem());
        let recovered = Pattern::from_values(name.clone(), self.state().to_vec())?;

        let corrupted_dir = self.workdir.corrupted_dir();
        recovered.save(&corrupted_dir)?;
        raster::render_to_png(&recovered, &corrupted_dir, &self.config.grid)?;

        self.phase = Phase::Loaded;
        Ok(name)
    }

    /// Drop the query and the current state, keeping the couplings.
    pub fn clear(&mut self) {
        if let Some(dynamics) = self.dynamics.as_mut() {
            dynamics.clear();
        }
        self.reference = None;
        self.noisy = None;
        self.cut = None;
        self.current = None;
        if self.dynamics.is_some() {
            self.phase = Phase::Loaded;
        }
    }

    /// The configured corrupted-files directory, for callers that inspect
    /// the persisted copies.
    pub fn corrupted_dir(&self) -> std::path::PathBuf {
        self.workdir.corrupted_dir()
    }

    /// The configured patterns directory.
    pub fn patterns_dir(&self) -> std::path::PathBuf {
        self.workdir.patterns_dir()
    }
}

/// Convenience check used by tests and the recall binary: does `dir`
/// contain the four files a corrupted query produces?
pub fn corrupted_files_exist(dir: &Path, stem: &str) -> bool {
    ["noise.txt", "noise.png", "cut.txt", "cut.png"]
        .iter()
        .all(|suffix| dir.join(format!("{stem}.{suffix}")).is_file())
}
