//! Region filtering: raw detector rectangles to numbered board regions

use crate::geometry::{Point, Rect};
use log::debug;
use serde::{Deserialize, Serialize};

/// Area and aspect limits for candidate tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFilterConfig {
    /// Lower area bound as a fraction of the frame area (exclusive)
    pub min_area_frac: f64,
    /// Upper area bound as a fraction of the frame area (exclusive)
    pub max_area_frac: f64,
    /// Lower width/height bound (exclusive)
    pub aspect_min: f64,
    /// Upper width/height bound (exclusive)
    pub aspect_max: f64,
    /// Order regions by row, then by x, instead of detector order
    pub row_sort: bool,
}

impl Default for RegionFilterConfig {
    fn default() -> Self {
        Self {
            min_area_frac: 0.005,
            max_area_frac: 0.15,
            aspect_min: 0.7,
            aspect_max: 1.3,
            row_sort: true,
        }
    }
}

/// A filtered rectangle with its id on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: usize,
    pub rect: Rect,
    pub center: Point,
}

impl Region {
    pub fn new(id: usize, rect: Rect) -> Self {
        Self {
            id,
            rect,
            center: rect.center(),
        }
    }
}

/// Output of [`RegionFilter::apply`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOutcome {
    pub regions: Vec<Region>,
    pub rejected: usize,
}

impl FilterOutcome {
    /// At least two regions are needed to form a pair
    pub fn is_sufficient(&self) -> bool {
        self.regions.len() >= 2
    }
}

/// Rejects rectangles that cannot be tiles and numbers the rest
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    config: RegionFilterConfig,
}

impl RegionFilter {
    pub fn new(config: RegionFilterConfig) -> Self {
        Self { config }
    }

    /// Whether a rectangle passes the area and aspect gates for the given frame area
    pub fn accepts(&self, rect: &Rect, frame_area: f64) -> bool {
        let area = rect.area() as f64;
        let aspect = rect.aspect();

        self.config.min_area_frac * frame_area < area
            && area < self.config.max_area_frac * frame_area
            && self.config.aspect_min < aspect
            && aspect < self.config.aspect_max
    }

    /// Filter raw rectangles and assign ids in output order
    pub fn apply(&self, raw: &[Rect], frame_width: u32, frame_height: u32) -> FilterOutcome {
        let frame_area = frame_width as f64 * frame_height as f64;

        let mut kept: Vec<Rect> = raw
            .iter()
            .copied()
            .filter(|rect| self.accepts(rect, frame_area))
            .collect();
        let rejected = raw.len() - kept.len();

        if self.config.row_sort {
            kept = sort_by_rows(kept);
        }

        debug!(
            "region filter kept {} of {} rectangles ({} rejected)",
            kept.len(),
            raw.len(),
            rejected
        );

        FilterOutcome {
            regions: kept
                .into_iter()
                .enumerate()
                .map(|(id, rect)| Region::new(id, rect))
                .collect(),
            rejected,
        }
    }
}

/// Reading order: group into rows, then left to right.
///
/// A rectangle joins the current row when its top is within half the row
/// anchor's height of the anchor's top. Ties keep detector order.
pub fn sort_by_rows(mut rects: Vec<Rect>) -> Vec<Rect> {
    rects.sort_by_key(|rect| rect.y());

    let mut rows: Vec<Vec<Rect>> = Vec::new();
    for rect in rects {
        match rows.last_mut() {
            Some(row)
                if (rect.y() - row[0].y()).abs() as f64 <= 0.5 * row[0].height() as f64 =>
            {
                row.push(rect)
            }
            _ => rows.push(vec![rect]),
        }
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by_key(|rect| rect.x());
            row
        })
        .collect()
}
