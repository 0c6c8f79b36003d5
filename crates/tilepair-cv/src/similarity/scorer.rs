//! Composite dissimilarity and the acceptance gates

use super::{SimilarityConfig, ZONAL_SCALE};
use crate::descriptor::Descriptor;
use crate::tile::Tile;
use crate::traits::PatchOps;
use serde::Serialize;

/// Which gate turned a pair away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateRejection {
    SizeMismatch,
    ColorMismatch,
    ShapeMismatch,
}

/// Every signal measured for one pair of tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similarity {
    /// Worst quadrant difference, 0..=4000
    pub zonal_diff: f64,
    /// Hue/saturation histogram correlation, -1..=1
    pub hist_correlation: f64,
    /// `|area(a) - area(b)| / max(area(a), area(b))`
    pub size_ratio: f64,
    /// `zonal_diff + (1 - hist_correlation) * hist_weight`, lower is more similar
    pub score: f64,
}

impl Similarity {
    /// Apply the gates in cheapest-first order; all must pass
    pub fn gate(&self, config: &SimilarityConfig) -> Result<(), GateRejection> {
        if self.size_ratio >= config.size_ratio_threshold {
            return Err(GateRejection::SizeMismatch);
        }
        if self.hist_correlation <= config.hist_threshold {
            return Err(GateRejection::ColorMismatch);
        }
        if self.zonal_diff >= config.zonal_threshold {
            return Err(GateRejection::ShapeMismatch);
        }
        Ok(())
    }

    pub fn passes(&self, config: &SimilarityConfig) -> bool {
        self.gate(config).is_ok()
    }
}

/// Compares tile descriptors
pub struct SimilarityScorer<'a> {
    config: &'a SimilarityConfig,
    ops: &'a dyn PatchOps,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(config: &'a SimilarityConfig, ops: &'a dyn PatchOps) -> Self {
        Self { config, ops }
    }

    /// Worst-quadrant pixel difference.
    ///
    /// The maximum rather than the mean, so one strongly different region
    /// decides the score even when the other three match.
    pub fn zonal_diff(&self, a: &Descriptor, b: &Descriptor) -> f64 {
        a.quadrants
            .iter()
            .zip(&b.quadrants)
            .map(|(qa, qb)| {
                let pixels = (qa.width().min(qb.width()) * qa.height().min(qb.height())) as f64;
                if pixels == 0.0 {
                    return 0.0;
                }
                let differing = self.ops.count_differing(qa, qb, self.config.pixel_diff_cutoff);
                differing as f64 / pixels * ZONAL_SCALE
            })
            .fold(0.0, f64::max)
    }

    pub fn hist_correlation(&self, a: &Descriptor, b: &Descriptor) -> f64 {
        self.ops.compare_hist(&a.histogram, &b.histogram)
    }

    /// Measure all signals for a pair
    pub fn compare(&self, a: &Tile, b: &Tile) -> Similarity {
        let zonal_diff = self.zonal_diff(&a.descriptor, &b.descriptor);
        let hist_correlation = self.hist_correlation(&a.descriptor, &b.descriptor);
        let (area_a, area_b) = (a.area() as f64, b.area() as f64);
        let size_ratio = (area_a - area_b).abs() / area_a.max(area_b);

        Similarity {
            zonal_diff,
            hist_correlation,
            size_ratio,
            score: zonal_diff + (1.0 - hist_correlation) * self.config.hist_weight,
        }
    }

    /// Measure and gate in one go
    pub fn evaluate(&self, a: &Tile, b: &Tile) -> Result<Similarity, GateRejection> {
        let similarity = self.compare(a, b);
        similarity.gate(self.config).map(|_| similarity)
    }
}
