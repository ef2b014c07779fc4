/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Earth-centered, Earth-fixed Cartesian coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Geodetic coordinates in degrees and meters above the ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cartographic {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: f64,
}

impl Cartographic {
    pub fn from_degrees(lon_deg: f64, lat_deg: f64, height_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            height_m,
        }
    }

    pub fn to_ecef(self) -> Ecef {
        let lat = self.lat_deg.to_radians();
        let lon = self.lon_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        Ecef::new(
            (n + self.height_m) * cos_lat * cos_lon,
            (n + self.height_m) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_E2) + self.height_m) * sin_lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Cartographic, WGS84_A, WGS84_E2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_lies_on_x_axis() {
        let ecef = Cartographic::from_degrees(0.0, 0.0, 0.0).to_ecef();
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn height_extends_along_the_normal() {
        let ecef = Cartographic::from_degrees(90.0, 0.0, 500.0).to_ecef();
        assert_close(ecef.x, 0.0, 1e-6);
        assert_close(ecef.y, WGS84_A + 500.0, 1e-6);
    }

    #[test]
    fn north_pole_uses_polar_radius() {
        let ecef = Cartographic::from_degrees(0.0, 90.0, 0.0).to_ecef();
        let b = WGS84_A * (1.0 - WGS84_E2).sqrt();
        assert_close(ecef.z, b, 1e-6);
    }
}
