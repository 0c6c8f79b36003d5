//! Tilepair core
//!
//! Pixel-free board logic for pair hints: tile rectangles, the region filter
//! and the orthogonal connectivity check.

pub mod geometry;
pub mod path;
pub mod region;

pub use geometry::{Aabb, Point, Rect, RectError};
pub use path::{ConnectivityConfig, ConnectivityValidator, OrthoPath, PathThickness, Segment};
pub use region::{FilterOutcome, Region, RegionFilter, RegionFilterConfig};
