//! Orthogonal path segments and their thickened bands

use crate::geometry::{Aabb, Point};
use serde::{Deserialize, Serialize};

/// A straight piece of a path between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Whether the segment runs mostly along x
    pub fn is_horizontal(&self) -> bool {
        (self.end.x - self.start.x).abs() >= (self.end.y - self.start.y).abs()
    }

    /// The segment inflated to a band of width `thickness`.
    ///
    /// Only the perpendicular axis is inflated; the band spans exactly the
    /// segment's extent along its own axis. A segment whose endpoints drift
    /// slightly off-axis gets a band covering both endpoints.
    pub fn band(&self, thickness: f32) -> Aabb {
        let half = thickness / 2.0;
        let (min_x, max_x) = min_max(self.start.x, self.end.x);
        let (min_y, max_y) = min_max(self.start.y, self.end.y);

        if self.is_horizontal() {
            Aabb::new(min_x, min_y - half, max_x, max_y + half)
        } else {
            Aabb::new(min_x - half, min_y, max_x + half, max_y)
        }
    }

    /// A segment is clear when its band strictly overlaps no obstacle
    pub fn is_clear(&self, obstacles: &[Aabb], thickness: f32) -> bool {
        let band = self.band(thickness);
        !obstacles.iter().any(|obstacle| band.overlaps(obstacle))
    }
}

fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A route of up to three segments between two tile centers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthoPath {
    points: Vec<Point>,
}

impl OrthoPath {
    /// Build a path from its waypoints, start and end included
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
    }

    /// Number of right-angle turns
    pub fn turns(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    /// Total Manhattan length
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].manhattan(&pair[1]))
            .sum()
    }

    pub fn is_clear(&self, obstacles: &[Aabb], thickness: f32) -> bool {
        self.segments()
            .all(|segment| segment.is_clear(obstacles, thickness))
    }
}
