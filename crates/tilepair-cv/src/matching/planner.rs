//! Greedy disjoint pairing: best-scoring connected partner first

use crate::similarity::{Similarity, SimilarityScorer};
use crate::tile::Tile;
use log::{debug, trace};
use serde::Serialize;
use tilepair_core::{ConnectivityValidator, OrthoPath, PathThickness, Rect, Region};

/// Two tiles proposed as an eliminable pair
#[derive(Debug, Clone, Serialize)]
pub struct PairCandidate {
    pub a: Tile,
    pub b: Tile,
    /// Composite dissimilarity, lower is more similar
    pub score: f64,
    pub similarity: Similarity,
    pub connected: bool,
    pub path: Option<OrthoPath>,
}

/// Pairs plus the work it took to find them
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub pairs: Vec<PairCandidate>,
    /// Candidates that passed every similarity gate
    pub gated_candidates: usize,
    pub connectivity_checks: usize,
}

/// Walks tiles in id order and pairs each with its best connected partner.
///
/// A tile is never revisited once paired, which keeps the result disjoint
/// without backtracking. Greedy, not a maximum matching.
pub struct MatchPlanner<'a> {
    scorer: &'a SimilarityScorer<'a>,
    validator: ConnectivityValidator,
    thickness: PathThickness,
}

impl<'a> MatchPlanner<'a> {
    pub fn new(
        scorer: &'a SimilarityScorer<'a>,
        validator: ConnectivityValidator,
        thickness: PathThickness,
    ) -> Self {
        Self {
            scorer,
            validator,
            thickness,
        }
    }

    /// Pair up `tiles`, treating every region of `board` other than the two
    /// tiles under test as an obstacle.
    pub fn plan(&self, tiles: &[Tile], board: &[Region]) -> PlanOutcome {
        let mut ordered: Vec<&Tile> = tiles.iter().collect();
        ordered.sort_by_key(|tile| tile.id);

        let capacity = board
            .iter()
            .map(|region| region.id)
            .chain(ordered.iter().map(|tile| tile.id))
            .max()
            .map_or(0, |max| max + 1);
        let mut visited = vec![false; capacity];
        let mut outcome = PlanOutcome::default();

        for (i, a) in ordered.iter().enumerate() {
            if visited[a.id] {
                continue;
            }

            let mut candidates: Vec<(&Tile, Similarity)> = ordered[i + 1..]
                .iter()
                .filter(|b| !visited[b.id])
                .filter_map(|b| match self.scorer.evaluate(a, b) {
                    Ok(similarity) => Some((*b, similarity)),
                    Err(rejection) => {
                        trace!("pair ({}, {}) rejected: {:?}", a.id, b.id, rejection);
                        None
                    }
                })
                .collect();
            outcome.gated_candidates += candidates.len();

            candidates.sort_by(|x, y| x.1.score.total_cmp(&y.1.score));

            for (b, similarity) in candidates {
                outcome.connectivity_checks += 1;

                let thickness = self.thickness.resolve(&a.rect, &b.rect);
                let obstacles: Vec<Rect> = board
                    .iter()
                    .filter(|region| region.id != a.id && region.id != b.id)
                    .map(|region| region.rect)
                    .collect();

                if let Some(path) = self.validator.find_path(&a.rect, &b.rect, &obstacles, thickness)
                {
                    trace!(
                        "pair ({}, {}) accepted, score {:.1}, {} turn(s)",
                        a.id,
                        b.id,
                        similarity.score,
                        path.turns()
                    );
                    visited[a.id] = true;
                    visited[b.id] = true;
                    outcome.pairs.push(PairCandidate {
                        a: (*a).clone(),
                        b: b.clone(),
                        score: similarity.score,
                        similarity,
                        connected: true,
                        path: Some(path),
                    });
                    break;
                }
            }
        }

        debug!(
            "planner: {} pairs from {} gated candidates, {} connectivity checks",
            outcome.pairs.len(),
            outcome.gated_candidates,
            outcome.connectivity_checks
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorConfig, DescriptorExtractor};
    use crate::similarity::SimilarityConfig;
    use crate::utils::ImageOps;
    use image::{Rgb, RgbImage};
    use std::collections::HashSet;

    const COLORS: [Rgb<u8>; 3] = [
        Rgb([230, 40, 40]),
        Rgb([40, 40, 230]),
        Rgb([40, 200, 40]),
    ];

    /// One row of 40x40 tiles at x = 10, 60, 110, ... painted with `kinds`
    fn board(kinds: &[usize]) -> (RgbImage, Vec<Region>) {
        let regions: Vec<Region> = (0..kinds.len())
            .map(|i| Region::new(i, Rect::new(10 + 50 * i as i32, 10, 40, 40).unwrap()))
            .collect();
        let frame = RgbImage::from_fn(400, 100, |x, y| {
            regions
                .iter()
                .find(|r| {
                    let (x, y) = (x as i32, y as i32);
                    x >= r.rect.x() && x < r.rect.right() && y >= r.rect.y() && y < r.rect.bottom()
                })
                .map_or(Rgb([0, 0, 0]), |r| COLORS[kinds[r.id]])
        });
        (frame, regions)
    }

    fn plan(kinds: &[usize]) -> PlanOutcome {
        let (frame, regions) = board(kinds);
        let descriptor_config = DescriptorConfig::default();
        let (tiles, _) =
            DescriptorExtractor::new(&descriptor_config, &ImageOps).describe_all(&frame, &regions);

        let config = SimilarityConfig::default();
        let scorer = SimilarityScorer::new(&config, &ImageOps);
        let planner = MatchPlanner::new(
            &scorer,
            ConnectivityValidator::new(400, 100),
            PathThickness::Auto,
        );
        planner.plan(&tiles, &regions)
    }

    fn ids(outcome: &PlanOutcome) -> Vec<(usize, usize)> {
        outcome.pairs.iter().map(|p| (p.a.id, p.b.id)).collect()
    }

    #[test]
    fn test_inner_and_outer_pairs() {
        let outcome = plan(&[0, 1, 1, 0]);
        assert_eq!(ids(&outcome), vec![(0, 3), (1, 2)]);
        assert_eq!(outcome.pairs[0].path.as_ref().unwrap().turns(), 2);
        assert_eq!(outcome.pairs[1].path.as_ref().unwrap().turns(), 0);
    }

    #[test]
    fn test_pairs_are_disjoint() {
        let outcome = plan(&[0, 0, 0, 0, 0, 1, 1]);

        let mut seen = HashSet::new();
        for pair in &outcome.pairs {
            assert!(seen.insert(pair.a.id));
            assert!(seen.insert(pair.b.id));
            assert!(pair.a.id < pair.b.id);
        }
        assert_eq!(ids(&outcome), vec![(0, 1), (2, 3), (5, 6)]);
    }

    #[test]
    fn test_unmatched_kind_stays_unpaired() {
        let outcome = plan(&[0, 1, 2]);
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.gated_candidates, 0);
    }
}
