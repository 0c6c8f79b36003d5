//! Pair planning and ranking

pub mod planner;
pub mod ranker;

pub use planner::{MatchPlanner, PairCandidate, PlanOutcome};
pub use ranker::{RankedPair, RankingConfig, ResultRanker, RANK_COLORS};
