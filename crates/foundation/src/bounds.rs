/// Tolerance used when testing rectangles for overlap, in degrees.
pub const RECTANGLE_EPSILON: f64 = 1e-7;

/// Geographic bounding rectangle in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRectangle {
    pub const MAX: GeoRectangle = GeoRectangle {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        GeoRectangle {
            west,
            south,
            east,
            north,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Inclusive on every edge.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    pub fn intersects(&self, other: &GeoRectangle) -> bool {
        let e = RECTANGLE_EPSILON;
        let outside = self.east < other.west - e
            || self.north < other.south - e
            || self.west - e > other.east
            || self.south - e > other.north;
        !outside
    }
}
