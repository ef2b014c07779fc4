//! Fixed presentation of city markers.

use scene::components::{
    Color, HeightReference, HorizontalOrigin, LabelGraphics, LabelStyle, NearFarScalar,
    PointGraphics, VerticalOrigin,
};

/// Markers float this far above the reported elevation, in meters.
pub const ELEVATION_OFFSET_M: f64 = 500.0;

/// `(minimum population, font size in px)`, ascending.
pub const SIZE_BANDS: [(f64, u32); 4] = [
    (0.0, 48),
    (50_000.0, 52),
    (250_000.0, 64),
    (1_000_000.0, 72),
];

/// Fade in between 10 km and 20 km camera distance.
pub const CITY_TRANSLUCENCY: NearFarScalar = NearFarScalar::new(10_000.0, 0.0, 20_000.0, 1.0);

/// Font size for a city of `population`.
///
/// Band thresholds are inclusive; the last band whose threshold is reached wins.
pub fn label_size_px(population: f64) -> u32 {
    let mut size = SIZE_BANDS[0].1;
    for (threshold, band) in SIZE_BANDS {
        if population >= threshold {
            size = band;
        }
    }
    size
}

pub fn city_label(name: &str, population: f64) -> LabelGraphics {
    LabelGraphics {
        text: name.to_string(),
        font: format!("{}px sans-serif", label_size_px(population)),
        style: LabelStyle::FillAndOutline,
        fill_color: Color::LEMONCHIFFON,
        outline_color: Color::BLACK,
        outline_width: 4.0,
        vertical_origin: VerticalOrigin::Bottom,
        horizontal_origin: HorizontalOrigin::Center,
        eye_offset: [0.0, 0.0, -1000.0],
        pixel_offset: [0.0, -15.0],
        disable_depth_test_distance: f64::INFINITY,
        translucency_by_distance: Some(CITY_TRANSLUCENCY),
        scale: 0.25,
    }
}

pub fn city_point() -> PointGraphics {
    PointGraphics {
        color: Color::FIREBRICK,
        pixel_size: 6.0,
        height_reference: HeightReference::ClampToGround,
        disable_depth_test_distance: 6_000_000.0,
        translucency_by_distance: Some(CITY_TRANSLUCENCY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bands_by_population() {
        assert_eq!(label_size_px(0.0), 48);
        assert_eq!(label_size_px(49_999.0), 48);
        assert_eq!(label_size_px(50_000.0), 52);
        assert_eq!(label_size_px(249_999.0), 52);
        assert_eq!(label_size_px(250_000.0), 64);
        assert_eq!(label_size_px(1_000_000.0), 72);
        assert_eq!(label_size_px(2_000_000.0), 72);
        assert_eq!(label_size_px(-1.0), 48);
    }

    #[test]
    fn label_font_follows_size_band() {
        let label = city_label("Lyon", 513_275.0);
        assert_eq!(label.font, "64px sans-serif");
        assert_eq!(label.text, "Lyon");
        assert_eq!(label.translucency_by_distance, Some(CITY_TRANSLUCENCY));
    }
}
