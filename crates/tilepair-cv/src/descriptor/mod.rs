//! Per-tile descriptors

pub mod extractor;
pub mod histogram;

pub use extractor::DescriptorExtractor;
pub use histogram::HsHistogram;

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// How much of a tile's border is cut away before describing it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMargin {
    /// Fixed margin in pixels on every side
    Pixels(u32),
    /// Margin on each side as a fraction of the tile's width / height
    Fraction(f32),
}

impl CropMargin {
    /// Margins `(dx, dy)` for a tile of the given size
    pub fn resolve(&self, width: i32, height: i32) -> (i32, i32) {
        match *self {
            CropMargin::Pixels(px) => {
                let px = i32::try_from(px).unwrap_or(i32::MAX);
                (px, px)
            }
            CropMargin::Fraction(frac) => (
                (width as f32 * frac).round() as i32,
                (height as f32 * frac).round() as i32,
            ),
        }
    }
}

/// Descriptor extraction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    pub crop_margin: CropMargin,
    /// Side of the square patch every tile is resized to
    pub patch_size: u32,
    pub hue_bins: usize,
    pub sat_bins: usize,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            crop_margin: CropMargin::Fraction(0.25),
            patch_size: 32,
            hue_bins: 50,
            sat_bins: 60,
        }
    }
}

/// Structural and color signature of one tile
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// The resized patch
    pub patch: RgbImage,
    /// The patch split into top-left, top-right, bottom-left, bottom-right
    pub quadrants: [RgbImage; 4],
    pub histogram: HsHistogram,
}
