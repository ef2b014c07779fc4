use crate::components::{Color, NearFarScalar};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeightReference {
    None,
    ClampToGround,
    RelativeToGround,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointGraphics {
    pub color: Color,
    pub pixel_size: f32,
    pub height_reference: HeightReference,
    /// Depth testing is skipped for cameras closer than this, in meters.
    pub disable_depth_test_distance: f64,
    pub translucency_by_distance: Option<NearFarScalar>,
}

impl Default for PointGraphics {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            pixel_size: 1.0,
            height_reference: HeightReference::None,
            disable_depth_test_distance: 0.0,
            translucency_by_distance: None,
        }
    }
}
