//! Image helpers and the default patch primitives, built on the image crate

use crate::descriptor::HsHistogram;
use crate::error::PipelineError;
use crate::traits::PatchOps;
use crate::Result;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;
use tilepair_core::Rect;

/// Patch primitives backed by `image` and `palette`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOps;

impl PatchOps for ImageOps {
    fn resize(&self, patch: &RgbImage, size: u32) -> RgbImage {
        imageops::resize(patch, size, size, FilterType::Triangle)
    }

    fn count_differing(&self, a: &RgbImage, b: &RgbImage, cutoff: u8) -> u32 {
        let width = a.width().min(b.width());
        let height = a.height().min(b.height());

        // per-channel absolute difference, then collapsed to intensity
        let diff: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            let pa = a.get_pixel(x, y);
            let pb = b.get_pixel(x, y);
            Rgb([
                pa[0].abs_diff(pb[0]),
                pa[1].abs_diff(pb[1]),
                pa[2].abs_diff(pb[2]),
            ])
        });

        imageops::grayscale(&diff)
            .pixels()
            .filter(|p| p[0] > cutoff)
            .count() as u32
    }

    fn hs_histogram(&self, patch: &RgbImage, hue_bins: usize, sat_bins: usize) -> HsHistogram {
        HsHistogram::compute(patch, hue_bins, sat_bins)
    }

    fn compare_hist(&self, a: &HsHistogram, b: &HsHistogram) -> f64 {
        a.correlation(b)
    }
}

/// Image loading and conversion helpers
pub struct ImageUtils;

impl ImageUtils {
    /// Load any supported image file as RGB
    pub fn load_color<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
        Ok(image::open(path)?.to_rgb8())
    }

    /// Wrap a tightly packed RGB8 buffer
    pub fn rgb_from_raw(buffer: Vec<u8>, width: u32, height: u32) -> Result<RgbImage> {
        let expected = width as usize * height as usize * 3;
        let actual = buffer.len();

        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            PipelineError::InvalidImage(format!(
                "{width}x{height} RGB needs {expected} bytes, got {actual}"
            ))
        })
    }

    /// Copy the pixels under `rect`, which must lie inside the image
    pub fn crop(image: &RgbImage, rect: &Rect) -> RgbImage {
        imageops::crop_imm(
            image,
            rect.x() as u32,
            rect.y() as u32,
            rect.width() as u32,
            rect.height() as u32,
        )
        .to_image()
    }

    /// The whole image as a rectangle, `None` for an empty image
    pub fn frame_rect(image: &RgbImage) -> Option<Rect> {
        Rect::new(0, 0, image.width() as i32, image.height() as i32).ok()
    }
}
