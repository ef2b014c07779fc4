//! Tiling schemes: mapping between `(level, x, y)` and geographic rectangles.

use std::f64::consts::PI;

use crate::bounds::GeoRectangle;
use crate::tile::TileCoordinate;

/// Latitude limit of the square web-mercator world, in degrees.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Deepest geographic level; tile counts at deeper levels overflow `u32`.
pub const MAX_TILE_LEVEL: u32 = 29;

/// Equirectangular tiling with two tiles across and one tile down at level 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeographicTilingScheme {
    pub rectangle: GeoRectangle,
    pub level_zero_tiles_x: u32,
    pub level_zero_tiles_y: u32,
}

impl Default for GeographicTilingScheme {
    fn default() -> Self {
        Self {
            rectangle: GeoRectangle::MAX,
            level_zero_tiles_x: 2,
            level_zero_tiles_y: 1,
        }
    }
}

impl GeographicTilingScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels beyond [`MAX_TILE_LEVEL`] count as `MAX_TILE_LEVEL`.
    pub fn tiles_x_at_level(&self, level: u32) -> u32 {
        self.level_zero_tiles_x << level.min(MAX_TILE_LEVEL)
    }

    pub fn tiles_y_at_level(&self, level: u32) -> u32 {
        self.level_zero_tiles_y << level.min(MAX_TILE_LEVEL)
    }

    pub fn tile_xy_to_rectangle(&self, x: u32, y: u32, level: u32) -> GeoRectangle {
        let r = self.rectangle;

        let tile_w = r.width() / self.tiles_x_at_level(level) as f64;
        let west = x as f64 * tile_w + r.west;
        let east = (x + 1) as f64 * tile_w + r.west;

        let tile_h = r.height() / self.tiles_y_at_level(level) as f64;
        let north = r.north - y as f64 * tile_h;
        let south = r.north - (y + 1) as f64 * tile_h;

        GeoRectangle::from_degrees(west, south, east, north)
    }

    /// Tile containing a position, or `None` outside the scheme's rectangle.
    pub fn position_to_tile_xy(&self, lon: f64, lat: f64, level: u32) -> Option<(u32, u32)> {
        let r = self.rectangle;
        if !r.contains(lon, lat) {
            return None;
        }

        let xs = self.tiles_x_at_level(level);
        let ys = self.tiles_y_at_level(level);
        let x = ((lon - r.west) / (r.width() / xs as f64)) as u32;
        let y = ((r.north - lat) / (r.height() / ys as f64)) as u32;
        Some((x.min(xs - 1), y.min(ys - 1)))
    }

    pub fn tile(&self, level: u32, x: u32, y: u32) -> TileCoordinate {
        TileCoordinate::new(level, x, y, self.tile_xy_to_rectangle(x, y, level))
    }
}

/// Web-mercator tile containing `(lon, lat)` at `zoom`.
pub fn lon_lat_to_tile(lon: f64, lat: f64, zoom: u32) -> (u32, u32) {
    let lat_rad = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
    let n = (1u64 << zoom) as f64;
    let max = (1u64 << zoom) - 1;

    let x = ((lon + 180.0) / 360.0 * n).floor().max(0.0) as u64;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().max(0.0) as u64;
    (x.min(max) as u32, y.min(max) as u32)
}

/// North-west corner of a web-mercator tile as `(lon, lat)`.
pub fn tile_to_lon_lat(x: u32, y: u32, zoom: u32) -> (f64, f64) {
    let n = (1u64 << zoom) as f64;
    let lon = x as f64 / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();
    (lon, lat)
}

pub fn mercator_tile_rectangle(x: u32, y: u32, zoom: u32) -> GeoRectangle {
    let (west, north) = tile_to_lon_lat(x, y, zoom);
    let (east, south) = tile_to_lon_lat(x + 1, y + 1, zoom);
    GeoRectangle::from_degrees(west, south, east, north)
}
