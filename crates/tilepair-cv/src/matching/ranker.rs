//! Final ordering of accepted pairs for display

use super::planner::PairCandidate;
use serde::{Deserialize, Serialize};

/// Display colors handed out by rank, best first
pub const RANK_COLORS: [(u8, u8, u8); 8] = [
    (0, 255, 0),
    (255, 0, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 128, 0),
    (128, 0, 255),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// How many pairs are shown at most
    pub max_display_pairs: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_display_pairs: 5,
        }
    }
}

/// A pair with its display rank and color
#[derive(Debug, Clone, Serialize)]
pub struct RankedPair {
    /// 0 is the most similar pair
    pub rank: usize,
    pub color: (u8, u8, u8),
    #[serde(flatten)]
    pub candidate: PairCandidate,
}

#[derive(Debug, Clone, Default)]
pub struct ResultRanker {
    config: RankingConfig,
}

impl ResultRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Sort ascending by score, keep the display budget, color by rank.
    ///
    /// The budget never exceeds the color table, so every shown pair gets
    /// its own color.
    pub fn rank(&self, mut pairs: Vec<PairCandidate>) -> Vec<RankedPair> {
        pairs.sort_by(|a, b| a.score.total_cmp(&b.score));

        pairs
            .into_iter()
            .zip(RANK_COLORS)
            .take(self.config.max_display_pairs)
            .enumerate()
            .map(|(rank, (candidate, color))| RankedPair {
                rank,
                color,
                candidate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Descriptor, HsHistogram};
    use crate::similarity::Similarity;
    use crate::tile::Tile;
    use image::RgbImage;
    use tilepair_core::{Rect, Region};

    fn tile(id: usize) -> Tile {
        let patch = RgbImage::new(2, 2);
        let descriptor = Descriptor {
            quadrants: [
                RgbImage::new(1, 1),
                RgbImage::new(1, 1),
                RgbImage::new(1, 1),
                RgbImage::new(1, 1),
            ],
            histogram: HsHistogram::compute(&patch, 2, 2),
            patch,
        };
        Tile::new(
            &Region::new(id, Rect::new(id as i32 * 10, 0, 10, 10).unwrap()),
            descriptor,
        )
    }

    fn candidate(a: usize, b: usize, score: f64) -> PairCandidate {
        PairCandidate {
            a: tile(a),
            b: tile(b),
            score,
            similarity: Similarity {
                zonal_diff: score,
                hist_correlation: 1.0,
                size_ratio: 0.0,
                score,
            },
            connected: true,
            path: None,
        }
    }

    #[test]
    fn test_sorted_truncated_and_colored() {
        let pairs = (0..7)
            .map(|i| candidate(2 * i, 2 * i + 1, (7 - i) as f64 * 100.0))
            .collect();
        let ranked = ResultRanker::default().rank(pairs);

        assert_eq!(ranked.len(), 5);
        let scores: Vec<f64> = ranked.iter().map(|p| p.candidate.score).collect();
        assert_eq!(scores, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(ranked[0].rank, 0);
        assert_eq!(ranked[0].candidate.a.id, 12);
        assert_eq!(ranked[0].color, RANK_COLORS[0]);
        assert_ne!(ranked[1].color, ranked[0].color);
    }

    #[test]
    fn test_colors_stay_distinct_past_the_table() {
        let pairs = (0..10)
            .map(|i| candidate(2 * i, 2 * i + 1, i as f64))
            .collect();
        let ranker = ResultRanker::new(RankingConfig {
            max_display_pairs: 10,
        });
        let ranked = ranker.rank(pairs);

        assert_eq!(ranked.len(), RANK_COLORS.len());
        let colors: std::collections::HashSet<_> = ranked.iter().map(|p| p.color).collect();
        assert_eq!(colors.len(), ranked.len());
        assert_eq!(ranked.last().map(|p| p.rank), Some(RANK_COLORS.len() - 1));
    }

    #[test]
    fn test_empty_input() {
        assert!(ResultRanker::default().rank(Vec::new()).is_empty());
    }
}
