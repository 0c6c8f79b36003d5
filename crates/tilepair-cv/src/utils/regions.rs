//! Edge-based region proposals
//!
//! A simple stand-in for a real board detector: edges, a small dilation to
//! close the tile outlines, then the bounding box of every outer contour.

use crate::traits::RegionSource;
use image::{imageops, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::dilate;
use imageproc::point::Point;
use log::debug;
use serde::{Deserialize, Serialize};
use tilepair_core::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeRegionProposer {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Dilation radius applied to the edge mask, 0 to disable
    pub dilate_radius: u8,
}

impl Default for EdgeRegionProposer {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 100.0,
            dilate_radius: 2,
        }
    }
}

impl RegionSource for EdgeRegionProposer {
    fn propose(&self, frame: &RgbImage) -> Vec<Rect> {
        let gray = imageops::grayscale(frame);
        let edges = canny(&gray, self.canny_low, self.canny_high);
        let mask = if self.dilate_radius > 0 {
            dilate(&edges, Norm::LInf, self.dilate_radius)
        } else {
            edges
        };

        let mut rects: Vec<Rect> = find_contours::<i32>(&mask)
            .into_iter()
            .filter(|contour| matches!(contour.border_type, BorderType::Outer))
            .filter_map(|contour| bounding_rect(&contour.points))
            .collect();
        rects.dedup();

        debug!("edge proposer found {} regions", rects.len());
        rects
    }
}

fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;

    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_finds_two_squares() {
        let squares = [(30u32, 30u32), (120, 40)];
        let frame = RgbImage::from_fn(200, 120, |x, y| {
            let inside = squares
                .iter()
                .any(|&(sx, sy)| (sx..sx + 40).contains(&x) && (sy..sy + 40).contains(&y));
            if inside { Rgb([230, 230, 230]) } else { Rgb([10, 10, 10]) }
        });

        let rects = EdgeRegionProposer::default().propose(&frame);
        assert_eq!(rects.len(), 2);

        for (sx, sy) in squares {
            let (cx, cy) = (sx as f32 + 20.0, sy as f32 + 20.0);
            assert!(rects.iter().any(|r| {
                let c = r.center();
                (c.x - cx).abs() < 4.0 && (c.y - cy).abs() < 4.0
            }));
        }
    }

    #[test]
    fn test_blank_frame_has_no_regions() {
        let frame = RgbImage::from_pixel(64, 64, Rgb([80, 80, 80]));
        assert!(EdgeRegionProposer::default().propose(&frame).is_empty());
    }

    #[test]
    fn test_bounding_rect() {
        let points = [Point::new(3, 4), Point::new(7, 2), Point::new(5, 9)];
        assert_eq!(bounding_rect(&points), Rect::new(3, 2, 5, 8).ok());
        assert_eq!(bounding_rect(&[]), None);
    }
}
