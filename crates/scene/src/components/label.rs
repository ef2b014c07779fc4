use crate::components::{Color, NearFarScalar};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerticalOrigin {
    Center,
    Bottom,
    Baseline,
    Top,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HorizontalOrigin {
    Center,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LabelStyle {
    Fill,
    Outline,
    FillAndOutline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelGraphics {
    pub text: String,
    /// CSS font shorthand, e.g. `"48px sans-serif"`.
    pub font: String,
    pub style: LabelStyle,
    pub fill_color: Color,
    pub outline_color: Color,
    pub outline_width: f32,
    pub vertical_origin: VerticalOrigin,
    pub horizontal_origin: HorizontalOrigin,
    pub eye_offset: [f64; 3],
    pub pixel_offset: [f64; 2],
    pub disable_depth_test_distance: f64,
    pub translucency_by_distance: Option<NearFarScalar>,
    pub scale: f32,
}

impl LabelGraphics {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: "30px sans-serif".to_string(),
            style: LabelStyle::Fill,
            fill_color: Color::WHITE,
            outline_color: Color::BLACK,
            outline_width: 1.0,
            vertical_origin: VerticalOrigin::Baseline,
            horizontal_origin: HorizontalOrigin::Left,
            eye_offset: [0.0; 3],
            pixel_offset: [0.0; 2],
            disable_depth_test_distance: 0.0,
            translucency_by_distance: None,
            scale: 1.0,
        }
    }
}
