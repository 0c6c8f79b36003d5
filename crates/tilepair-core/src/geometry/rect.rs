//! Rectangles, points and float boxes in image pixel coordinates
//!
//! `Rect` is what the region detector hands us; `Aabb` is the float box the
//! connectivity checks work with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RectError {
    #[error("rectangle must have a positive size, got {width}x{height}")]
    EmptyRect { width: i32, height: i32 },

    #[error("rectangle at ({x}, {y}) with size {width}x{height} runs past the coordinate range")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the length of an orthogonal route between two points
    pub fn manhattan(&self, other: &Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Deserialize)]
struct RawRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl TryFrom<RawRect> for Rect {
    type Error = RectError;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        Rect::new(raw.x, raw.y, raw.width, raw.height)
    }
}

/// Integer bounding box produced by region detection.
///
/// Width and height are always positive and the right/bottom edges fit in
/// `i32`; the only way to get a `Rect` is through [`Rect::new`] (or
/// deserialization, which goes through it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Create a new rectangle, rejecting non-positive sizes and edges that
    /// overflow `i32`
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, RectError> {
        if width <= 0 || height <= 0 {
            return Err(RectError::EmptyRect { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(RectError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Area in pixels
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Width over height
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Exact center: top-left plus half the size
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Intersection with another rectangle, `None` when they share no area
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        Rect::new(x1, y1, x2.checked_sub(x1)?, y2.checked_sub(y1)?).ok()
    }

    /// Shrink inward by `dx` on the left and right and `dy` on the top and bottom
    pub fn shrink(&self, dx: i32, dy: i32) -> Option<Rect> {
        let width = self.width.checked_sub(dx.checked_mul(2)?)?;
        let height = self.height.checked_sub(dy.checked_mul(2)?)?;
        Rect::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?, width, height).ok()
    }

    /// Float box covering the same pixels
    pub fn to_aabb(&self) -> Aabb {
        Aabb::new(
            self.x as f32,
            self.y as f32,
            self.right() as f32,
            self.bottom() as f32,
        )
    }
}

/// Float axis-aligned box `[min_x, max_x] x [min_y, max_y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Strict overlap on both axes.
    ///
    /// Boxes that only share an edge (zero-width overlap) do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rejects_empty() {
        assert_eq!(
            Rect::new(0, 0, 0, 10),
            Err(RectError::EmptyRect {
                width: 0,
                height: 10
            })
        );
        assert!(Rect::new(0, 0, 10, -1).is_err());
    }

    #[test]
    fn test_rect_center_and_area() {
        let rect = Rect::new(10, 20, 40, 30).unwrap();
        assert_eq!(rect.center(), Point::new(30.0, 35.0));
        assert_eq!(rect.area(), 1200);
        assert_eq!(rect.right(), 50);
        assert_eq!(rect.bottom(), 50);
    }

    #[test]
    fn test_shrink_to_nothing() {
        let rect = Rect::new(0, 0, 10, 10).unwrap();
        assert_eq!(rect.shrink(2, 3), Rect::new(2, 3, 6, 4).ok());
        assert!(rect.shrink(5, 0).is_none());
    }

    #[test]
    fn test_intersect_clips_to_frame() {
        let frame = Rect::new(0, 0, 100, 100).unwrap();
        let rect = Rect::new(90, -5, 20, 20).unwrap();
        assert_eq!(rect.intersect(&frame), Rect::new(90, 0, 10, 15).ok());

        let outside = Rect::new(100, 0, 10, 10).unwrap();
        assert!(outside.intersect(&frame).is_none());
    }

    #[test]
    fn test_aabb_touching_is_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 20.0, 10.0);
        let overlapping = Aabb::new(9.5, 5.0, 20.0, 10.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Rect = serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(ok, Rect::new(1, 2, 3, 4).unwrap());

        let bad = serde_json::from_str::<Rect>(r#"{"x":1,"y":2,"width":0,"height":4}"#);
        assert!(bad.is_err());

        let overflowing =
            serde_json::from_str::<Rect>(r#"{"x":2147483600,"y":10,"width":60,"height":60}"#);
        assert!(overflowing.is_err());
    }

    #[test]
    fn test_rect_rejects_overflowing_edges() {
        assert_eq!(
            Rect::new(2_147_483_600, 10, 60, 60),
            Err(RectError::OutOfRange {
                x: 2_147_483_600,
                y: 10,
                width: 60,
                height: 60
            })
        );
        assert!(Rect::new(0, i32::MAX, 10, 1).is_err());

        let edge = Rect::new(i32::MAX - 60, 10, 60, 60).unwrap();
        assert_eq!(edge.right(), i32::MAX);
    }

    #[test]
    fn test_far_rects_do_not_overflow() {
        let frame = Rect::new(0, 0, 400, 400).unwrap();
        let far = Rect::new(i32::MAX - 60, 10, 60, 60).unwrap();
        assert!(far.intersect(&frame).is_none());
        assert!(far.shrink(15, 15).is_some());

        let near_min = Rect::new(i32::MIN, i32::MIN, 10, 10).unwrap();
        assert!(near_min.intersect(&far).is_none());
        assert!(frame.shrink(i32::MAX, 0).is_none());
    }
}
