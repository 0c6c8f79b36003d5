//! Utility modules

pub mod image;
pub mod regions;

pub use self::image::{ImageOps, ImageUtils};
pub use self::regions::EdgeRegionProposer;
