//! Tiles: filtered regions carrying their descriptors

use crate::descriptor::Descriptor;
use crate::error::DescriptorError;
use serde::{Serialize, Serializer};
use tilepair_core::{Point, Rect, Region};

/// A described tile, owned by one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub id: usize,
    pub rect: Rect,
    pub center: Point,
    #[serde(skip)]
    pub descriptor: Descriptor,
}

impl Tile {
    pub fn new(region: &Region, descriptor: Descriptor) -> Self {
        Self {
            id: region.id,
            rect: region.rect,
            center: region.center,
            descriptor,
        }
    }

    pub fn area(&self) -> i64 {
        self.rect.area()
    }
}

/// A region left out of matching because it could not be described
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedTile {
    pub id: usize,
    pub rect: Rect,
    #[serde(serialize_with = "serialize_display")]
    pub reason: DescriptorError,
}

fn serialize_display<S: Serializer>(error: &DescriptorError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
