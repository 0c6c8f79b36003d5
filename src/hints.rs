//! Pair hints for a screenshot, falling back through config presets

use anyhow::{Context, Result};
use image::RgbImage;
use log::{debug, info};
use std::path::Path;
use tilepair_core::Rect;
use tilepair_cv::traits::RegionSource;
use tilepair_cv::utils::EdgeRegionProposer;
use tilepair_cv::{MatchResult, PairDetector, PipelineConfig};

/// A finished run and the detector that produced it
pub struct Detection {
    pub preset: String,
    pub detector: PairDetector,
    pub result: MatchResult,
}

/// Regions from a JSON list of rectangles, or proposed from the frame's edges
pub fn load_regions(frame: &RgbImage, regions_path: Option<&Path>) -> Result<Vec<Rect>> {
    match regions_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read regions: {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse regions: {:?}", path))
        }
        None => Ok(EdgeRegionProposer::default().propose(frame)),
    }
}

/// Run each config in turn until one yields at least one pair
pub fn detect_hints(
    frame: &RgbImage,
    regions: &[Rect],
    configs: Vec<(String, PipelineConfig)>,
) -> Result<Detection> {
    let (width, height) = frame.dimensions();
    let mut last = None;

    for (name, config) in configs {
        info!("Trying configuration: {}", name);

        let mut detector = PairDetector::new(config)
            .with_context(|| format!("Invalid configuration '{}'", name))?;
        let similarity = &detector.config().similarity;
        debug!(
            "  zonal < {}, histogram > {}, size ratio < {}, thickness {:?}",
            similarity.zonal_threshold,
            similarity.hist_threshold,
            similarity.size_ratio_threshold,
            detector.config().connectivity.path_thickness
        );
        let result = detector
            .detect(regions, frame, width, height)
            .context("Pair detection failed")?;

        if !result.pairs.is_empty() || result.is_insufficient() {
            return Ok(Detection {
                preset: name,
                detector,
                result,
            });
        }

        info!("  -> No pairs with {}, trying next configuration", name);
        last = Some(Detection {
            preset: name,
            detector,
            result,
        });
    }

    // Fallback: the last configuration even without pairs
    last.context("No configuration to run")
}
