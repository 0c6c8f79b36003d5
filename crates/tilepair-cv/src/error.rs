//! Error types for the pair detection pipeline

use thiserror::Error;
use tilepair_core::Rect;

/// Failures that abort a single pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid image buffer: {0}")]
    InvalidImage(String),

    #[error("frame is {actual:?} but {expected:?} was declared")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Why a single tile could not be described; the tile is dropped, the run goes on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("tile {rect:?} lies outside the frame")]
    OutOfFrame { rect: Rect },

    #[error("tile {rect:?} has no pixels left after a {margin_x}x{margin_y} px margin")]
    DegenerateCrop {
        rect: Rect,
        margin_x: i32,
        margin_y: i32,
    },
}
