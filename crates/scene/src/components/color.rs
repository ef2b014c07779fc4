/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color::from_rgb8(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);
    pub const LEMONCHIFFON: Color = Color::from_rgb8(0xff, 0xfa, 0xcd);
    pub const FIREBRICK: Color = Color::from_rgb8(0xb2, 0x22, 0x22);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }
}
