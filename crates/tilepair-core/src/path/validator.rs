//! Connectivity check: is there a route of at most two turns between two tiles
//! that stays clear of every other tile?

use super::segment::OrthoPath;
use crate::geometry::{Aabb, Point, Rect};
use log::trace;
use serde::{Deserialize, Serialize};

/// How wide a path band is when tested against obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "px")]
pub enum PathThickness {
    /// Half the smaller dimension of the two tiles being connected
    Auto,
    /// A fixed width in pixels
    Fixed(f32),
}

impl PathThickness {
    pub fn resolve(&self, a: &Rect, b: &Rect) -> f32 {
        match *self {
            PathThickness::Auto => {
                let smallest = a.width().min(a.height()).min(b.width()).min(b.height());
                smallest as f32 / 2.0
            }
            PathThickness::Fixed(px) => px,
        }
    }
}

/// Connectivity options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub path_thickness: PathThickness,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            path_thickness: PathThickness::Auto,
        }
    }
}

/// Searches for a straight, L-shaped or bridged route between tile centers
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityValidator {
    frame_width: f32,
    frame_height: f32,
}

impl ConnectivityValidator {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width: frame_width as f32,
            frame_height: frame_height as f32,
        }
    }

    pub fn is_connected(&self, a: &Rect, b: &Rect, obstacles: &[Rect], thickness: f32) -> bool {
        self.find_path(a, b, obstacles, thickness).is_some()
    }

    /// The first clear route found, trying 0, 1 and then 2 turns.
    ///
    /// `obstacles` must not contain `a` or `b` themselves.
    pub fn find_path(
        &self,
        a: &Rect,
        b: &Rect,
        obstacles: &[Rect],
        thickness: f32,
    ) -> Option<OrthoPath> {
        let boxes: Vec<Aabb> = obstacles.iter().map(Rect::to_aabb).collect();
        let (ca, cb) = (a.center(), b.center());

        let path = straight(ca, cb, &boxes, thickness)
            .or_else(|| one_turn(ca, cb, &boxes, thickness))
            .or_else(|| self.two_turns(a, b, &boxes, thickness));

        match &path {
            Some(found) => trace!(
                "path ({:.1},{:.1}) -> ({:.1},{:.1}) found with {} turn(s)",
                ca.x,
                ca.y,
                cb.x,
                cb.y,
                found.turns()
            ),
            None => trace!(
                "no path ({:.1},{:.1}) -> ({:.1},{:.1}) past {} obstacles",
                ca.x,
                ca.y,
                cb.x,
                cb.y,
                boxes.len()
            ),
        }

        path
    }

    fn two_turns(&self, a: &Rect, b: &Rect, boxes: &[Aabb], thickness: f32) -> Option<OrthoPath> {
        let (ca, cb) = (a.center(), b.center());

        let rows = bridge_lines(
            [0.0, self.frame_height, ca.y, cb.y],
            [a.to_aabb(), b.to_aabb()].iter().chain(boxes),
            |aabb| (aabb.min_y, aabb.max_y),
            thickness,
        );
        let columns = bridge_lines(
            [0.0, self.frame_width, ca.x, cb.x],
            [a.to_aabb(), b.to_aabb()].iter().chain(boxes),
            |aabb| (aabb.min_x, aabb.max_x),
            thickness,
        );

        let mut candidates: Vec<OrthoPath> = rows
            .into_iter()
            .map(|y| {
                OrthoPath::new(vec![ca, Point::new(ca.x, y), Point::new(cb.x, y), cb])
            })
            .chain(columns.into_iter().map(|x| {
                OrthoPath::new(vec![ca, Point::new(x, ca.y), Point::new(x, cb.y), cb])
            }))
            .collect();

        // shortest detour first
        candidates.sort_by(|p, q| p.length().total_cmp(&q.length()));

        candidates
            .into_iter()
            .find(|path| path.is_clear(boxes, thickness))
    }
}

fn straight(ca: Point, cb: Point, boxes: &[Aabb], thickness: f32) -> Option<OrthoPath> {
    let aligned = (ca.x - cb.x).abs() <= thickness || (ca.y - cb.y).abs() <= thickness;
    if !aligned {
        return None;
    }

    let path = OrthoPath::new(vec![ca, cb]);
    path.is_clear(boxes, thickness).then_some(path)
}

fn one_turn(ca: Point, cb: Point, boxes: &[Aabb], thickness: f32) -> Option<OrthoPath> {
    [Point::new(ca.x, cb.y), Point::new(cb.x, ca.y)]
        .into_iter()
        .map(|corner| OrthoPath::new(vec![ca, corner, cb]))
        .find(|path| path.is_clear(boxes, thickness))
}

/// Candidate bridge coordinates along one axis: the fixed lines plus both
/// edges of every box pushed outward by the thickness, sorted and deduplicated.
fn bridge_lines<'a>(
    fixed: [f32; 4],
    boxes: impl Iterator<Item = &'a Aabb>,
    extent: impl Fn(&Aabb) -> (f32, f32),
    thickness: f32,
) -> Vec<f32> {
    let mut lines: Vec<f32> = fixed.to_vec();
    for aabb in boxes {
        let (near, far) = extent(aabb);
        lines.push(near - thickness);
        lines.push(far + thickness);
    }

    lines.sort_by(f32::total_cmp);
    lines.dedup_by(|a, b| (*a - *b).abs() < 1e-3);
    lines
}
