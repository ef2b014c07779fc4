use std::hash::{Hash, Hasher};

use crate::bounds::GeoRectangle;

/// One rectangular tile of a fixed tiling scheme.
///
/// Identity is `(level, x, y)`; the bounding rectangle is carried along for
/// consumers but never takes part in equality or hashing.
#[derive(Debug, Copy, Clone)]
pub struct TileCoordinate {
    pub level: u32,
    pub x: u32,
    pub y: u32,
    pub bbox: GeoRectangle,
}

impl TileCoordinate {
    pub fn new(level: u32, x: u32, y: u32, bbox: GeoRectangle) -> Self {
        Self { level, x, y, bbox }
    }

    /// Stable textual key, `level/x/y`.
    pub fn tile_id(&self) -> String {
        format!("{}/{}/{}", self.level, self.x, self.y)
    }

    pub fn matches(&self, other: &TileCoordinate) -> bool {
        self.level == other.level && self.x == other.x && self.y == other.y
    }
}

impl PartialEq for TileCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for TileCoordinate {}

impl Hash for TileCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level.hash(state);
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl std::fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}
