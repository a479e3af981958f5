//! Engine configuration: grid geometry and corruption defaults as data.
//!
//! The noise probability and the cut rectangle are tuning knobs, not
//! constants: the values here are only defaults, and every stage takes
//! them through [`EngineConfig`]. A JSON file with any subset of the
//! fields overrides them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use hopnet_core::{HopError, HopResult};

/// Grid geometry of the pattern source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Pattern width in pixels.
    pub width: usize,
    /// Pattern height in pixels.
    pub height: usize,
    /// Binarization threshold: a pixel is `+1` when its integer luminance
    /// average `(r + g + b) / 3` is strictly above this.
    pub threshold: u8,
}

impl GridConfig {
    /// Neuron count of the network: one neuron per pixel.
    pub fn neurons(&self) -> usize {
        self.width * self.height
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            threshold: 127,
        }
    }
}

/// How recall corrupts a reference pattern into queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConfig {
    /// Per-position sign-flip probability of the noisy copy.
    pub noise_probability: f64,
    /// Fill value of the occluded window.
    pub cut_value: i8,
    /// 1-based inclusive row range of the occluded window.
    pub cut_rows: (usize, usize),
    /// 1-based inclusive column range of the occluded window.
    pub cut_cols: (usize, usize),
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            noise_probability: 0.08,
            cut_value: -1,
            cut_rows: (34, 58),
            cut_cols: (11, 35),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub corruption: CorruptionConfig,
}

impl EngineConfig {
    /// Load a configuration from a JSON file. Fields absent from the file
    /// keep their defaults.
    pub fn from_json_file(path: &Path) -> HopResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HopError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| {
            HopError::InvalidValue(format!("config \"{}\": {e}", path.display()))
        })
    }
}
