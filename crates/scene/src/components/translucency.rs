/// Scalar interpolated by camera distance: `near_value` at `near` meters and
/// closer, `far_value` at `far` meters and beyond.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NearFarScalar {
    pub near: f64,
    pub near_value: f64,
    pub far: f64,
    pub far_value: f64,
}

impl NearFarScalar {
    pub const fn new(near: f64, near_value: f64, far: f64, far_value: f64) -> Self {
        Self {
            near,
            near_value,
            far,
            far_value,
        }
    }

    pub fn evaluate(&self, distance: f64) -> f64 {
        if distance <= self.near {
            return self.near_value;
        }
        if distance >= self.far {
            return self.far_value;
        }
        let t = (distance - self.near) / (self.far - self.near);
        self.near_value + (self.far_value - self.near_value) * t
    }
}
