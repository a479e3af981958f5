//! Training stage: Hebbian construction of the coupling matrix from the
//! patterns directory.
//!
//! Reads every `*.txt` pattern file, fills a fresh packed matrix, and
//! writes it to `weight_matrix/weight_matrix.txt`. The read order does not
//! matter: the Hebbian sum is commutative and the matrix symmetric. A
//! malformed pattern file aborts the whole run; on success the output file
//! holds exactly `N * (N - 1) / 2` weights.

use hopnet_core::{HopResult, PackedSymMatrix, Pattern};

use crate::workdir::{Workdir, WEIGHT_MATRIX_FILE};

/// Classical storage-capacity estimate of a Hopfield network: patterns
/// beyond `0.138 * N` degrade recall sharply.
const CAPACITY_FACTOR: f64 = 0.138;

/// The training stage of one run.
pub struct Training {
    workdir: Workdir,
    neurons: usize,
    weight_matrix: PackedSymMatrix,
}

impl Training {
    /// Validate the patterns directory and prepare (create + clear) the
    /// weight-matrix output directory.
    pub fn new(workdir: Workdir, neurons: usize) -> HopResult<Self> {
        workdir.validate_patterns_dir()?;
        Workdir::prepare_output_dir(&workdir.weight_matrix_dir())?;

        Ok(Self {
            workdir,
            neurons,
            weight_matrix: PackedSymMatrix::new(neurons),
        })
    }

    /// The coupling matrix; empty until
    /// [`acquire_and_save_weight_matrix`](Training::acquire_and_save_weight_matrix)
    /// succeeds.
    pub fn weight_matrix(&self) -> &PackedSymMatrix {
        &self.weight_matrix
    }

    /// Load every pattern, fill the matrix, write `weight_matrix.txt`.
    pub fn acquire_and_save_weight_matrix(&mut self) -> HopResult<()> {
        let names = self.workdir.pattern_files()?;
        let patterns_dir = self.workdir.patterns_dir();

        let patterns: Vec<Pattern> = names
            .iter()
            .map(|name| Pattern::load(&patterns_dir, name, self.neurons))
            .collect::<HopResult<_>>()?;

        let capacity = CAPACITY_FACTOR * self.neurons as f64;
        if patterns.len() as f64 > capacity {
            log::warn!(
                "{} patterns exceed the capacity estimate {:.0} for {} neurons",
                patterns.len(),
                capacity,
                self.neurons
            );
        }

        self.weight_matrix.fill(&patterns)?;
        self.weight_matrix
            .save(&self.workdir.weight_matrix_dir(), WEIGHT_MATRIX_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pattern(workdir: &Workdir, name: &str, values: &[i8]) {
        Pattern::from_values(name, values.to_vec())
            .unwrap()
            .save(&workdir.patterns_dir())
            .unwrap();
    }

    fn fixture_workdir(tmp: &std::path::Path) -> Workdir {
        let workdir = Workdir::new(tmp);
        std::fs::create_dir_all(workdir.patterns_dir()).unwrap();
        workdir
    }

    #[test]
    fn test_training_writes_expected_weights() {
        let tmp = tempfile::tempdir().unwrap();
        let workdir = fixture_workdir(tmp.path());
        write_pattern(&workdir, "p1.txt", &[-1, 1, 1, -1]);
        write_pattern(&workdir, "p2.txt", &[1, -1, -1, 1]);

        let mut training = Training::new(workdir.clone(), 4).unwrap();
        training.acquire_and_save_weight_matrix().unwrap();

        assert_eq!(
            training.weight_matrix().weights(),
            &[-0.5, -0.5, 0.5, 0.5, -0.5, -0.5]
        );

        let loaded =
            PackedSymMatrix::load(&workdir.weight_matrix_dir(), WEIGHT_MATRIX_FILE, 4).unwrap();
        assert_eq!(loaded.weights(), training.weight_matrix().weights());
    }

    #[test]
    fn test_training_is_order_independent() {
        let tmp_a = tempfile::tempdir().unwrap();
        let a = fixture_workdir(tmp_a.path());
        write_pattern(&a, "1.txt", &[-1, 1, 1, -1]);
        write_pattern(&a, "2.txt", &[1, -1, -1, 1]);

        let tmp_b = tempfile::tempdir().unwrap();
        let b = fixture_workdir(tmp_b.path());
        write_pattern(&b, "1.txt", &[1, -1, -1, 1]);
        write_pattern(&b, "2.txt", &[-1, 1, 1, -1]);

        let mut ta = Training::new(a, 4).unwrap();
        ta.acquire_and_save_weight_matrix().unwrap();
        let mut tb = Training::new(b, 4).unwrap();
        tb.acquire_and_save_weight_matrix().unwrap();

        assert_eq!(ta.weight_matrix().weights(), tb.weight_matrix().weights());
    }

    #[test]
    fn test_malformed_pattern_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let workdir = fixture_workdir(tmp.path());
        write_pattern(&workdir, "good.txt", &[-1, 1, 1, -1]);
        // Undersized: three entries instead of four.
        std::fs::write(workdir.patterns_dir().join("short.txt"), "1 -1 1").unwrap();

        let mut training = Training::new(workdir.clone(), 4).unwrap();
        assert!(training.acquire_and_save_weight_matrix().is_err());
        assert!(
            training.weight_matrix().weights().is_empty(),
            "failed run must not leave a filled matrix"
        );
    }

    #[test]
    fn test_output_directory_is_cleared_on_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let workdir = fixture_workdir(tmp.path());
        write_pattern(&workdir, "p1.txt", &[-1, 1, 1, -1]);

        std::fs::create_dir_all(workdir.weight_matrix_dir()).unwrap();
        std::fs::write(workdir.weight_matrix_dir().join("stale.txt"), "x").unwrap();

        Training::new(workdir.clone(), 4).unwrap();
        assert!(!workdir.weight_matrix_dir().join("stale.txt").exists());
    }

    #[test]
    fn test_missing_patterns_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Training::new(Workdir::new(tmp.path()), 4).is_err());
    }
}
