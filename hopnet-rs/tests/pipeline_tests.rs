//! End-to-end pipeline tests: acquisition → training → recall over a
//! temporary workdir.
//!
//! The fast tests run on a 16x16 grid (256 neurons); the full 64x64
//! reference run (`M` = 8,386,560 couplings) is `#[ignore]`d because the
//! weight-matrix file alone is tens of megabytes.

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hopnet_core::{Outcome, Pattern};
use hopnet_rs::{
    Acquisition, CorruptionConfig, EngineConfig, GridConfig, Query, Recall, Training, Workdir,
    WEIGHT_MATRIX_FILE,
};

fn random_pattern(name: &str, neurons: usize, rng: &mut StdRng) -> Pattern {
    let values: Vec<i8> = (0..neurons)
        .map(|_| if rng.gen_bool(0.5) { 1 } else { -1 })
        .collect();
    Pattern::from_values(name, values).unwrap()
}

fn sixteen_config() -> EngineConfig {
    EngineConfig {
        grid: GridConfig {
            width: 16,
            height: 16,
            threshold: 127,
        },
        corruption: CorruptionConfig {
            noise_probability: 0.08,
            cut_value: -1,
            cut_rows: (9, 14),
            cut_cols: (3, 8),
        },
    }
}

/// Write `count` seeded random patterns into `workdir` and train a matrix
/// from them. Returns the references.
fn seed_and_train(workdir: &Workdir, neurons: usize, count: usize, seed: u64) -> Vec<Pattern> {
    std::fs::create_dir_all(workdir.patterns_dir()).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let references: Vec<Pattern> = (0..count)
        .map(|k| random_pattern(&format!("p{k}.txt"), neurons, &mut rng))
        .collect();
    for reference in &references {
        reference.save(&workdir.patterns_dir()).unwrap();
    }

    let mut training = Training::new(workdir.clone(), neurons).unwrap();
    training.acquire_and_save_weight_matrix().unwrap();
    references
}

#[test]
fn test_pipeline_recovers_noisy_and_cut_queries() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = Workdir::new(tmp.path());
    let config = sixteen_config();
    let references = seed_and_train(&workdir, config.grid.neurons(), 4, 7);

    let mut recall = Recall::new(workdir.clone(), config).unwrap();
    recall.load_weight_matrix().unwrap();

    let mut rng = StdRng::seed_from_u64(1234);
    recall.corrupt_pattern("p0.txt", &mut rng).unwrap();

    for query in [Query::Noisy, Query::Cut] {
        recall.set_initial_state(query).unwrap();
        let outcome = recall.run_to_fixed_point().unwrap();

        assert!(
            matches!(outcome, Outcome::FixedPoint { .. }),
            "expected a fixed point, got {outcome:?}"
        );
        assert_eq!(
            recall.state(),
            references[0].values(),
            "recall of {query:?} query must reproduce the stored pattern"
        );
        assert_eq!(recall.hamming_to_reference(), Some(0));

        let saved = recall.save_current_state().unwrap();
        let recovered =
            Pattern::load(&workdir.corrupted_dir(), &saved, references[0].len()).unwrap();
        assert_eq!(recovered.values(), references[0].values());
    }
}

#[test]
fn test_every_stored_pattern_recovers_from_noise() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = Workdir::new(tmp.path());
    let config = sixteen_config();
    let references = seed_and_train(&workdir, config.grid.neurons(), 4, 21);

    let mut recall = Recall::new(workdir, config).unwrap();
    recall.load_weight_matrix().unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    for (k, reference) in references.iter().enumerate() {
        recall
            .corrupt_pattern(&format!("p{k}.txt"), &mut rng)
            .unwrap();
        recall.set_initial_state(Query::Noisy).unwrap();
        recall.run_to_fixed_point().unwrap();

        assert_eq!(
            recall.state(),
            reference.values(),
            "pattern p{k}.txt did not recover"
        );
    }
}

#[test]
fn test_stored_patterns_are_fixed_points_of_the_trained_matrix() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = Workdir::new(tmp.path());
    let config = sixteen_config();
    let references = seed_and_train(&workdir, config.grid.neurons(), 4, 5);

    let matrix = hopnet_core::PackedSymMatrix::load(
        &workdir.weight_matrix_dir(),
        WEIGHT_MATRIX_FILE,
        config.grid.neurons(),
    )
    .unwrap();

    for reference in &references {
        let next = hopnet_core::synchronous_step(&matrix, reference.values());
        assert_eq!(next, reference.values(), "{} moved", reference.name());
    }
}

#[test]
fn test_acquisition_feeds_training() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = Workdir::new(tmp.path());
    let config = sixteen_config();

    std::fs::create_dir_all(workdir.source_images_dir()).unwrap();
    for (name, cell) in [("coarse.png", 8u32), ("fine.png", 4u32)] {
        let img = RgbImage::from_fn(32, 32, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        img.save(workdir.source_images_dir().join(name)).unwrap();
    }

    let mut acquisition = Acquisition::new(workdir.clone(), config).unwrap();
    acquisition.acquire_and_save_patterns().unwrap();
    assert_eq!(acquisition.patterns().len(), 2);

    let mut training = Training::new(workdir.clone(), config.grid.neurons()).unwrap();
    training.acquire_and_save_weight_matrix().unwrap();

    let neurons = config.grid.neurons();
    assert_eq!(
        training.weight_matrix().weights().len(),
        neurons * (neurons - 1) / 2
    );

    let text = std::fs::read_to_string(workdir.weight_matrix_dir().join(WEIGHT_MATRIX_FILE))
        .unwrap();
    assert_eq!(text.split_whitespace().count(), neurons * (neurons - 1) / 2);
}

/// The full 64x64 pipeline over four stored patterns. Slow: the
/// weight-matrix file holds 8,386,560 doubles. Run with
/// `cargo test -- --ignored`.
#[test]
#[ignore]
fn test_full_grid_reference_run() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = Workdir::new(tmp.path());
    let config = EngineConfig::default();
    let neurons = config.grid.neurons();
    assert_eq!(neurons, 4096);

    let references = seed_and_train(&workdir, neurons, 4, 64);

    let mut recall = Recall::new(workdir, config).unwrap();
    recall.load_weight_matrix().unwrap();
    let mut rng = StdRng::seed_from_u64(4096);

    for (k, reference) in references.iter().enumerate() {
        recall
            .corrupt_pattern(&format!("p{k}.txt"), &mut rng)
            .unwrap();

        for query in [Query::Noisy, Query::Cut] {
            recall.set_initial_state(query).unwrap();
            let outcome = recall.run_to_fixed_point().unwrap();
            assert!(matches!(outcome, Outcome::FixedPoint { .. }));
            assert_eq!(
                recall.state(),
                reference.values(),
                "p{k}.txt failed to recover from the {query:?} query"
            );
        }
    }
}
