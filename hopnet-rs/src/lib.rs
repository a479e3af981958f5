//! # hopnet-rs
//!
//! The pipeline around `hopnet-core`: acquisition of binarized patterns
//! from raster images, Hebbian training of the coupling matrix, and recall
//! of a stored pattern from its corrupted copies.
//!
//! The three stages share one on-disk layout (see [`workdir`]) and one
//! configuration (see [`config`]); each stage is also exposed as a binary
//! under `src/bin/`.

pub mod acquisition;
pub mod config;
pub mod raster;
pub mod recall;
pub mod training;
pub mod workdir;

pub use acquisition::Acquisition;
pub use config::{CorruptionConfig, EngineConfig, GridConfig};
pub use recall::{Phase, Query, Recall};
pub use training::Training;
pub use workdir::{Workdir, WEIGHT_MATRIX_FILE};
