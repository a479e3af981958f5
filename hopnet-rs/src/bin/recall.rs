//! Recover a stored pattern from its corrupted copies.
//!
//! Takes the reference pattern's file name as the only argument
//! (default `ae.txt`), corrupts it into a noisy and a cut copy, runs both
//! back to a fixed point, and saves the recovered states alongside the
//! corrupted files.

use anyhow::Result;
use rand::thread_rng;

use hopnet_rs::{EngineConfig, Query, Recall, Workdir};

fn main() -> Result<()> {
    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ae.txt".to_string());

    let config = EngineConfig::default();
    let mut recall = Recall::new(Workdir::new("."), config)?;
    recall.load_weight_matrix()?;
    recall.corrupt_pattern(&name, &mut thread_rng())?;

    for (query, label) in [(Query::Noisy, "noisy"), (Query::Cut, "cut")] {
        recall.set_initial_state(query)?;
        println!("{label} query of \"{name}\":");

        let outcome = recall.run_to_fixed_point_with(|iteration, energy| {
            println!("  iteration {iteration}: energy {energy:.3}");
        })?;
        let distance = recall.hamming_to_reference().unwrap_or_default();
        println!(
            "  {outcome:?}; Hamming distance to reference: {distance}"
        );

        let saved = recall.save_current_state()?;
        println!("  saved {saved}");
    }
    Ok(())
}
