//! Geometry primitives

pub mod rect;

pub use rect::{Aabb, Point, Rect, RectError};
