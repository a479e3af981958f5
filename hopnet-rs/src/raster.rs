//! Image front-end adaptor: decode, bilinear resize, binarize, render.
//!
//! The engine core only ever sees ±1 vectors; this module is the thin
//! bridge between raster files and patterns. Binarization takes the integer
//! luminance average `(r + g + b) / 3` per pixel and emits `+1` strictly
//! above the threshold; rendering maps `+1` to white and `-1` to black.

use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use hopnet_core::{HopError, HopResult, Pattern};

use crate::config::GridConfig;

fn raster_err(path: &Path, source: image::ImageError) -> HopError {
    HopError::Io {
        path: path.display().to_string(),
        source: io::Error::new(io::ErrorKind::Other, source),
    }
}

/// Decode a raster file, requiring at least `min_width x min_height` pixels.
pub fn load_raster(path: &Path, min_width: u32, min_height: u32) -> HopResult<RgbImage> {
    let img = image::open(path).map_err(|e| raster_err(path, e))?.to_rgb8();

    if img.width() < min_width || img.height() < min_height {
        return Err(HopError::InvalidArgument(format!(
            "image \"{}\" is {}x{}; minimum size is {min_width}x{min_height}",
            path.display(),
            img.width(),
            img.height()
        )));
    }
    Ok(img)
}

/// Resize with bilinear interpolation.
pub fn resize_bilinear(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Binarize a resized image into a pattern named `name`.
///
/// Row-major over pixels: `+1` when the integer average `(r + g + b) / 3`
/// exceeds the grid threshold, `-1` otherwise.
pub fn binarize(img: &RgbImage, name: impl Into<String>, grid: &GridConfig) -> HopResult<Pattern> {
    let name = name.into();
    if (img.width() as usize, img.height() as usize) != (grid.width, grid.height) {
        return Err(HopError::SizeMismatch {
            what: format!("image for pattern \"{name}\""),
            expected: grid.neurons(),
            actual: (img.width() * img.height()) as usize,
        });
    }

    let mut pattern = Pattern::new(name);
    for y in 0..img.height() {
        for x in 0..img.width() {
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            let average = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
            let value = if average > u32::from(grid.threshold) {
                1
            } else {
                -1
            };
            pattern.push(value)?;
        }
    }
    Ok(pattern)
}

/// Render a pattern as a `width x height` image: `+1` white, `-1` black.
pub fn render(pattern: &Pattern, width: u32, height: u32) -> HopResult<RgbImage> {
    if pattern.len() != (width * height) as usize {
        return Err(HopError::SizeMismatch {
            what: format!("pattern \"{}\"", pattern.name()),
            expected: (width * height) as usize,
            actual: pattern.len(),
        });
    }

    let values = pattern.values();
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let index = (y * width + x) as usize;
        if values[index] == 1 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    }))
}

/// Render `pattern` and write it to `dir/<stem>.png`. Returns the path.
pub fn render_to_png(pattern: &Pattern, dir: &Path, grid: &GridConfig) -> HopResult<PathBuf> {
    let img = render(pattern, grid.width as u32, grid.height as u32)?;
    let path = dir.join(format!("{}.png", pattern.stem()));
    img.save(&path).map_err(|e| raster_err(&path, e))?;
    Ok(path)
}
