//! Synthetic board screenshots

use image::{Rgb, RgbImage};
use tilepair_core::Rect;

/// Icon colors, one per kind
pub const KIND_COLORS: [Rgb<u8>; 5] = [
    Rgb([230, 40, 40]),
    Rgb([40, 40, 230]),
    Rgb([40, 200, 40]),
    Rgb([240, 220, 30]),
    Rgb([230, 40, 230]),
];

/// A tile to paint: top-left corner, side length and kind
#[derive(Debug, Clone, Copy)]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub kind: usize,
}

pub fn tile(x: i32, y: i32, kind: usize) -> TileSpec {
    TileSpec {
        x,
        y,
        size: 40,
        kind,
    }
}

/// Paint tiles on a dark background: a gray rim with the kind's color inside.
/// Returns the frame and the tile rectangles in the given order.
pub fn board(width: u32, height: u32, tiles: &[TileSpec]) -> (RgbImage, Vec<Rect>) {
    let frame = RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as i32, y as i32);
        tiles
            .iter()
            .find(|t| x >= t.x && x < t.x + t.size && y >= t.y && y < t.y + t.size)
            .map_or(Rgb([15, 15, 15]), |t| {
                let rim = t.size / 8;
                let inner = x >= t.x + rim
                    && x < t.x + t.size - rim
                    && y >= t.y + rim
                    && y < t.y + t.size - rim;
                if inner {
                    KIND_COLORS[t.kind]
                } else {
                    Rgb([150, 150, 150])
                }
            })
    });

    let rects = tiles
        .iter()
        .map(|t| Rect::new(t.x, t.y, t.size, t.size).expect("positive tile size"))
        .collect();
    (frame, rects)
}
