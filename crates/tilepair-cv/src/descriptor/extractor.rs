//! Descriptor extraction: crop, resize, split, histogram

use super::{Descriptor, DescriptorConfig};
use crate::error::DescriptorError;
use crate::tile::{DroppedTile, Tile};
use crate::traits::PatchOps;
use crate::utils::ImageUtils;
use image::{imageops, RgbImage};
use log::{debug, warn};
use tilepair_core::{Rect, Region};

/// Builds descriptors for tiles of one frame.
///
/// Extraction holds no mutable state, so tiles can be described in any
/// order or in parallel.
pub struct DescriptorExtractor<'a> {
    config: &'a DescriptorConfig,
    ops: &'a dyn PatchOps,
}

impl<'a> DescriptorExtractor<'a> {
    pub fn new(config: &'a DescriptorConfig, ops: &'a dyn PatchOps) -> Self {
        Self { config, ops }
    }

    /// Describe the pixels under `rect`, minus the border margin
    pub fn extract(&self, frame: &RgbImage, rect: &Rect) -> Result<Descriptor, DescriptorError> {
        let (margin_x, margin_y) = self.config.crop_margin.resolve(rect.width(), rect.height());
        let inner = rect
            .shrink(margin_x, margin_y)
            .ok_or(DescriptorError::DegenerateCrop {
                rect: *rect,
                margin_x,
                margin_y,
            })?;

        let visible = ImageUtils::frame_rect(frame)
            .and_then(|frame_rect| inner.intersect(&frame_rect))
            .ok_or(DescriptorError::OutOfFrame { rect: *rect })?;

        let crop = ImageUtils::crop(frame, &visible);
        let patch = self.ops.resize(&crop, self.config.patch_size);
        let histogram = self
            .ops
            .hs_histogram(&patch, self.config.hue_bins, self.config.sat_bins);

        Ok(Descriptor {
            quadrants: split_quadrants(&patch),
            patch,
            histogram,
        })
    }

    pub fn describe(&self, frame: &RgbImage, region: &Region) -> Result<Tile, DescriptorError> {
        self.extract(frame, &region.rect)
            .map(|descriptor| Tile::new(region, descriptor))
    }

    /// Describe every region; failures are reported, not fatal
    pub fn describe_all(&self, frame: &RgbImage, regions: &[Region]) -> (Vec<Tile>, Vec<DroppedTile>) {
        #[cfg(feature = "parallel")]
        let results: Vec<(Region, Result<Tile, DescriptorError>)> = {
            use rayon::prelude::*;
            regions
                .par_iter()
                .map(|region| (*region, self.describe(frame, region)))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<(Region, Result<Tile, DescriptorError>)> = regions
            .iter()
            .map(|region| (*region, self.describe(frame, region)))
            .collect();

        let mut tiles = Vec::with_capacity(results.len());
        let mut dropped = Vec::new();
        for (region, result) in results {
            match result {
                Ok(tile) => tiles.push(tile),
                Err(reason) => {
                    warn!("dropping tile {}: {}", region.id, reason);
                    dropped.push(DroppedTile {
                        id: region.id,
                        rect: region.rect,
                        reason,
                    });
                }
            }
        }

        debug!("described {} tiles, dropped {}", tiles.len(), dropped.len());
        (tiles, dropped)
    }
}

fn split_quadrants(patch: &RgbImage) -> [RgbImage; 4] {
    let half_w = patch.width() / 2;
    let half_h = patch.height() / 2;
    let quadrant = |x, y| imageops::crop_imm(patch, x, y, half_w, half_h).to_image();

    [
        quadrant(0, 0),
        quadrant(half_w, 0),
        quadrant(0, half_h),
        quadrant(half_w, half_h),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CropMargin;
    use crate::utils::ImageOps;
    use image::Rgb;

    fn frame_with_tile() -> RgbImage {
        // gray rim around a red core
        RgbImage::from_fn(100, 100, |x, y| {
            if (20..60).contains(&x) && (20..60).contains(&y) {
                if (30..50).contains(&x) && (30..50).contains(&y) {
                    Rgb([220, 30, 30])
                } else {
                    Rgb([120, 120, 120])
                }
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_margin_excludes_rim() {
        let config = DescriptorConfig::default();
        let extractor = DescriptorExtractor::new(&config, &ImageOps);
        let rect = Rect::new(20, 20, 40, 40).unwrap();

        let descriptor = extractor.extract(&frame_with_tile(), &rect).unwrap();
        assert_eq!(descriptor.patch.dimensions(), (32, 32));
        assert!(descriptor.patch.pixels().all(|p| *p == Rgb([220, 30, 30])));
        assert_eq!(descriptor.quadrants[3].dimensions(), (16, 16));
    }

    #[test]
    fn test_degenerate_crop_is_reported() {
        let config = DescriptorConfig {
            crop_margin: CropMargin::Pixels(10),
            ..Default::default()
        };
        let extractor = DescriptorExtractor::new(&config, &ImageOps);
        let rect = Rect::new(0, 0, 20, 30).unwrap();

        assert!(matches!(
            extractor.extract(&frame_with_tile(), &rect),
            Err(DescriptorError::DegenerateCrop { .. })
        ));
    }

    #[test]
    fn test_out_of_frame_tile_dropped() {
        let config = DescriptorConfig::default();
        let extractor = DescriptorExtractor::new(&config, &ImageOps);
        let regions = [
            Region::new(0, Rect::new(20, 20, 40, 40).unwrap()),
            Region::new(1, Rect::new(200, 200, 40, 40).unwrap()),
        ];

        let (tiles, dropped) = extractor.describe_all(&frame_with_tile(), &regions);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].id, 0);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, 1);
        assert_eq!(
            dropped[0].reason,
            DescriptorError::OutOfFrame {
                rect: regions[1].rect
            }
        );
    }
}
