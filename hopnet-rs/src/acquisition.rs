//! Acquisition stage: turn every source raster into a bipolar pattern file
//! plus a regenerated binarized raster.
//!
//! For each image in `images/source_images/`: decode, resize to the grid
//! with bilinear interpolation, binarize by luminance threshold, save the
//! pattern under `patterns/<stem>.txt`, then reload the saved file and
//! render it to `images/binarized_images/<stem>.png`. The reload makes the
//! rendered raster reflect what actually landed on disk.

use hopnet_core::{HopResult, Pattern};

use crate::config::EngineConfig;
use crate::raster;
use crate::workdir::Workdir;

/// The acquisition stage of one run.
pub struct Acquisition {
    workdir: Workdir,
    config: EngineConfig,
    patterns: Vec<Pattern>,
}

impl Acquisition {
    /// Validate the source directory and prepare (create + clear) the
    /// pattern and binarized-image output directories.
    pub fn new(workdir: Workdir, config: EngineConfig) -> HopResult<Self> {
        Workdir::validate_input_dir(&workdir.source_images_dir())?;
        Workdir::prepare_output_dir(&workdir.patterns_dir())?;
        Workdir::prepare_output_dir(&workdir.binarized_images_dir())?;

        Ok(Self {
            workdir,
            config,
            patterns: Vec::new(),
        })
    }

    /// Patterns produced by the last
    /// [`acquire_and_save_patterns`](Acquisition::acquire_and_save_patterns).
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Process every source raster, in sorted name order.
    pub fn acquire_and_save_patterns(&mut self) -> HopResult<()> {
        let source_dir = self.workdir.source_images_dir();
        let grid = self.config.grid;

        let mut names: Vec<String> = std::fs::read_dir(&source_dir)
            .map_err(|e| hopnet_core::HopError::Io {
                path: source_dir.display().to_string(),
                source: e,
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        self.patterns.clear();
        for name in names {
            let img = raster::load_raster(
                &source_dir.join(&name),
                grid.width as u32,
                grid.height as u32,
            )?;
            let resized = raster::resize_bilinear(&img, grid.width as u32, grid.height as u32);

            let stem = match name.rfind('.') {
                Some(dot) => &name[..dot],
                None => name.as_str(),
            };
            let pattern = raster::binarize(&resized, format!("{stem}.txt"), &grid)?;
            pattern.save(&self.workdir.patterns_dir())?;

            let saved = Pattern::load(
                &self.workdir.patterns_dir(),
                pattern.name(),
                grid.neurons(),
            )?;
            raster::render_to_png(&saved, &self.workdir.binarized_images_dir(), &grid)?;

            self.patterns.push(saved);
        }
        Ok(())
    }
}
