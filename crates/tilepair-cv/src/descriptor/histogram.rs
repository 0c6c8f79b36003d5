//! Hue/saturation histograms
//!
//! Brightness is left out on purpose so the same icon under different
//! lighting lands in the same bins.

use image::RgbImage;
use palette::{Hsv, IntoColor, Srgb};

/// Hue range on the 8-bit half-degree scale
const HUE_RANGE: f32 = 180.0;
/// Saturation range on the 8-bit scale
const SAT_RANGE: f32 = 256.0;

/// 2D histogram over hue and saturation, min-max normalized to `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct HsHistogram {
    hue_bins: usize,
    sat_bins: usize,
    bins: Vec<f32>,
}

impl HsHistogram {
    /// Histogram of every pixel in the patch
    pub fn compute(patch: &RgbImage, hue_bins: usize, sat_bins: usize) -> Self {
        let mut bins = vec![0.0f32; hue_bins * sat_bins];

        for pixel in patch.pixels() {
            let [r, g, b] = pixel.0;
            let hsv: Hsv = Srgb::new(r, g, b).into_format::<f32>().into_color();

            let hue = hsv.hue.into_positive_degrees() / 2.0;
            let sat = (hsv.saturation.clamp(0.0, 1.0) * 255.0).round();

            let h = ((hue * hue_bins as f32 / HUE_RANGE) as usize).min(hue_bins - 1);
            let s = ((sat * sat_bins as f32 / SAT_RANGE) as usize).min(sat_bins - 1);
            bins[h * sat_bins + s] += 1.0;
        }

        let mut histogram = Self {
            hue_bins,
            sat_bins,
            bins,
        };
        histogram.normalize_min_max();
        histogram
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    fn normalize_min_max(&mut self) {
        let min = self.bins.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.bins.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        if range > 0.0 {
            for bin in &mut self.bins {
                *bin = (*bin - min) / range;
            }
        } else {
            self.bins.fill(0.0);
        }
    }

    /// Pearson correlation of the bin values, in `[-1, 1]`.
    ///
    /// Flat histograms have no variance: two identical flat histograms
    /// correlate at 1, anything else involving a flat one at 0.
    pub fn correlation(&self, other: &HsHistogram) -> f64 {
        let same_shape = self.hue_bins == other.hue_bins && self.sat_bins == other.sat_bins;
        if !same_shape || self.bins.is_empty() {
            return 0.0;
        }

        let n = self.bins.len() as f64;
        let mean_a = self.bins.iter().map(|&v| v as f64).sum::<f64>() / n;
        let mean_b = other.bins.iter().map(|&v| v as f64).sum::<f64>() / n;

        let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
        for (&a, &b) in self.bins.iter().zip(&other.bins) {
            let da = a as f64 - mean_a;
            let db = b as f64 - mean_b;
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }

        let denom = (var_a * var_b).sqrt();
        if denom <= f64::EPSILON {
            return if var_a <= f64::EPSILON && var_b <= f64::EPSILON && self == other {
                1.0
            } else {
                0.0
            };
        }

        (cov / denom).clamp(-1.0, 1.0)
    }
}
