//! The pair detection pipeline: filter, describe, plan, rank

use super::config::PipelineConfig;
use crate::descriptor::DescriptorExtractor;
use crate::error::PipelineError;
use crate::matching::{MatchPlanner, RankedPair, ResultRanker};
use crate::similarity::SimilarityScorer;
use crate::tile::{DroppedTile, Tile};
use crate::traits::PatchOps;
use crate::utils::{ImageOps, ImageUtils};
use crate::Result;
use image::RgbImage;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tilepair_core::{ConnectivityValidator, Rect, RegionFilter};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchStatus {
    /// Pairing ran; the pair list may still be empty
    Completed,
    /// Fewer than two tiles survived filtering or description
    InsufficientDetections { count: usize },
}

/// Counters for diagnostic display
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    pub raw_regions: usize,
    pub filtered_tiles: usize,
    pub described_tiles: usize,
    pub gated_candidates: usize,
    pub connectivity_checks: usize,
    pub accepted_pairs: usize,
    pub processing_time_ms: u64,
}

/// Output of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    /// Disjoint pairs, ascending by score, within the display budget
    pub pairs: Vec<RankedPair>,
    pub tiles: Vec<Tile>,
    pub dropped: Vec<DroppedTile>,
    pub stats: MatchStats,
}

impl MatchResult {
    pub fn is_insufficient(&self) -> bool {
        matches!(self.status, MatchStatus::InsufficientDetections { .. })
    }
}

/// Pair detector; remembers the tiles of its last run only
pub struct PairDetector {
    config: PipelineConfig,
    ops: Box<dyn PatchOps>,
    last_tiles: Vec<Tile>,
}

impl PairDetector {
    /// Create a detector with the default patch primitives
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_ops(config, Box::new(ImageOps))
    }

    /// Create a detector with custom patch primitives
    pub fn with_ops(config: PipelineConfig, ops: Box<dyn PatchOps>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ops,
            last_tiles: Vec::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Tiles described by the most recent run
    pub fn last_tiles(&self) -> &[Tile] {
        &self.last_tiles
    }

    /// Run the pipeline on a tightly packed RGB8 buffer
    pub fn detect_from_raw(
        &mut self,
        raw_regions: &[Rect],
        buffer: Vec<u8>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<MatchResult> {
        let frame = ImageUtils::rgb_from_raw(buffer, frame_width, frame_height)?;
        self.detect(raw_regions, &frame, frame_width, frame_height)
    }

    /// Run the pipeline on one captured frame
    pub fn detect(
        &mut self,
        raw_regions: &[Rect],
        frame: &RgbImage,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<MatchResult> {
        let start_time = Instant::now();

        if frame_width == 0 || frame_height == 0 {
            return Err(PipelineError::InvalidImage(format!(
                "empty frame {frame_width}x{frame_height}"
            )));
        }
        if frame.dimensions() != (frame_width, frame_height) {
            return Err(PipelineError::DimensionMismatch {
                expected: (frame_width, frame_height),
                actual: frame.dimensions(),
            });
        }

        let mut stats = MatchStats {
            raw_regions: raw_regions.len(),
            ..Default::default()
        };

        let filtered = RegionFilter::new(self.config.region.clone()).apply(
            raw_regions,
            frame_width,
            frame_height,
        );
        stats.filtered_tiles = filtered.regions.len();

        if !filtered.is_sufficient() {
            return Ok(self.insufficient(filtered.regions.len(), Vec::new(), Vec::new(), stats, start_time));
        }

        let extractor = DescriptorExtractor::new(&self.config.descriptor, self.ops.as_ref());
        let (tiles, dropped) = extractor.describe_all(frame, &filtered.regions);
        stats.described_tiles = tiles.len();

        if tiles.len() < 2 {
            return Ok(self.insufficient(tiles.len(), tiles, dropped, stats, start_time));
        }

        let scorer = SimilarityScorer::new(&self.config.similarity, self.ops.as_ref());
        let planner = MatchPlanner::new(
            &scorer,
            ConnectivityValidator::new(frame_width, frame_height),
            self.config.connectivity.path_thickness,
        );
        let plan = planner.plan(&tiles, &filtered.regions);
        stats.gated_candidates = plan.gated_candidates;
        stats.connectivity_checks = plan.connectivity_checks;
        stats.accepted_pairs = plan.pairs.len();

        let pairs = ResultRanker::new(self.config.ranking.clone()).rank(plan.pairs);
        stats.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "{} tiles, {} pairs accepted, {} shown ({} ms)",
            tiles.len(),
            stats.accepted_pairs,
            pairs.len(),
            stats.processing_time_ms
        );

        self.last_tiles = tiles.clone();
        Ok(MatchResult {
            status: MatchStatus::Completed,
            pairs,
            tiles,
            dropped,
            stats,
        })
    }

    fn insufficient(
        &mut self,
        count: usize,
        tiles: Vec<Tile>,
        dropped: Vec<DroppedTile>,
        mut stats: MatchStats,
        start_time: Instant,
    ) -> MatchResult {
        debug!("insufficient detections: {count} usable tile(s)");
        stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
        self.last_tiles = tiles.clone();

        MatchResult {
            status: MatchStatus::InsufficientDetections { count },
            pairs: Vec::new(),
            tiles,
            dropped,
            stats,
        }
    }

    /// Export a result in JSON format
    pub fn export_json(&self, result: &MatchResult, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

/// One-shot pipeline run with a fresh detector
pub fn detect_pairs(
    raw_regions: &[Rect],
    frame: &RgbImage,
    frame_width: u32,
    frame_height: u32,
    config: &PipelineConfig,
) -> Result<MatchResult> {
    PairDetector::new(config.clone())?.detect(raw_regions, frame, frame_width, frame_height)
}
