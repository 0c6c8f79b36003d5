//! Pairwise tile similarity

pub mod scorer;

pub use scorer::{GateRejection, Similarity, SimilarityScorer};

use serde::{Deserialize, Serialize};

/// Scale every quadrant score is mapped onto, whatever the patch size
pub const ZONAL_SCALE: f64 = 4000.0;

/// Acceptance thresholds and score weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Worst-quadrant difference must stay below this (0..=4000)
    pub zonal_threshold: f64,
    /// Histogram correlation must exceed this (-1..=1)
    pub hist_threshold: f64,
    /// Relative area difference must stay below this
    pub size_ratio_threshold: f64,
    /// Intensity difference above which a pixel counts as different
    pub pixel_diff_cutoff: u8,
    /// Weight turning `1 - correlation` into zonal units
    pub hist_weight: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            zonal_threshold: 1500.0,
            hist_threshold: 0.8,
            size_ratio_threshold: 0.15,
            pixel_diff_cutoff: 50,
            hist_weight: 5000.0,
        }
    }
}

impl SimilarityConfig {
    /// Tight thresholds, fewer but safer hints
    pub fn strict() -> Self {
        Self {
            zonal_threshold: 1200.0,
            hist_threshold: 0.9,
            ..Default::default()
        }
    }

    /// Loose thresholds for noisy captures
    pub fn lenient() -> Self {
        Self {
            zonal_threshold: 1800.0,
            hist_threshold: 0.7,
            ..Default::default()
        }
    }
}
