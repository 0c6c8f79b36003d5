//! High-level detection module

pub mod config;
pub mod detector;

pub use config::PipelineConfig;
pub use detector::{detect_pairs, MatchResult, MatchStats, MatchStatus, PairDetector};
