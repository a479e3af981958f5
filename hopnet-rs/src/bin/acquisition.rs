//! Binarize every raster in `images/source_images/` into pattern files.
//!
//! Run from the directory that holds the `images/` tree; outputs land in
//! `patterns/` and `images/binarized_images/`.

use anyhow::Result;

use hopnet_rs::{Acquisition, EngineConfig, Workdir};

fn main() -> Result<()> {
    let config = EngineConfig::default();
    let mut acquisition = Acquisition::new(Workdir::new("."), config)?;
    acquisition.acquire_and_save_patterns()?;

    for pattern in acquisition.patterns() {
        println!(
            "binarized {} ({} neurons)",
            pattern.name(),
            pattern.len()
        );
    }
    println!("acquired {} patterns", acquisition.patterns().len());
    Ok(())
}
