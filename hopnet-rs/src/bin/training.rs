//! Train the coupling matrix from every pattern in `patterns/` and write
//! it to `weight_matrix/weight_matrix.txt`.

use anyhow::Result;

use hopnet_rs::{EngineConfig, Training, Workdir};

fn main() -> Result<()> {
    let config = EngineConfig::default();
    let mut training = Training::new(Workdir::new("."), config.grid.neurons())?;
    training.acquire_and_save_weight_matrix()?;

    println!(
        "trained {} couplings over {} neurons",
        training.weight_matrix().weights().len(),
        config.grid.neurons()
    );
    Ok(())
}
