//! Tilepair computer vision library
//!
//! Turns detected tile rectangles on a captured game board into ranked,
//! connectable pair hints.

pub mod descriptor;
pub mod detection;
pub mod error;
pub mod matching;
pub mod similarity;
pub mod tile;
pub mod utils;

// Re-export commonly used types
pub use detection::{detect_pairs, MatchResult, MatchStatus, PairDetector, PipelineConfig};
pub use error::{DescriptorError, PipelineError};
pub use matching::{PairCandidate, RankedPair};
pub use tile::{DroppedTile, Tile};

// Error handling
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Seams to the image-processing layer
pub mod traits {
    use crate::descriptor::HsHistogram;
    use image::RgbImage;
    use tilepair_core::Rect;

    /// Patch primitives the descriptors and the scorer are built on
    pub trait PatchOps: Send + Sync {
        /// Resize to a `size` x `size` patch
        fn resize(&self, patch: &RgbImage, size: u32) -> RgbImage;

        /// Pixels whose channel-wise difference, collapsed to intensity,
        /// exceeds `cutoff`. Between 0 and the pixel count.
        fn count_differing(&self, a: &RgbImage, b: &RgbImage, cutoff: u8) -> u32;

        /// Hue/saturation histogram normalized to `[0, 1]`
        fn hs_histogram(&self, patch: &RgbImage, hue_bins: usize, sat_bins: usize) -> HsHistogram;

        /// Histogram correlation in `[-1, 1]`, higher is more similar
        fn compare_hist(&self, a: &HsHistogram, b: &HsHistogram) -> f64;
    }

    /// Something that proposes candidate tile rectangles from a frame
    pub trait RegionSource {
        fn propose(&self, frame: &RgbImage) -> Vec<Rect>;
    }
}
