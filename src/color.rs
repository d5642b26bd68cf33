use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Species;
use crate::data::scatter::GroupKey;

/// Bar colour of the merged body-mass histogram.
pub const BODY_MASS: Color32 = Color32::from_rgb(0xD9, 0x5B, 0x43);

/// Fixed per-species colours.
pub fn species_color(species: Species) -> Color32 {
    match species {
        Species::Adelie => Color32::from_rgb(0x38, 0x6f, 0xa4),
        Species::Chinstrap => Color32::from_rgb(0x66, 0x2e, 0x9b),
        Species::Gentoo => Color32::from_rgb(0x46, 0x9d, 0x89),
    }
}

/// Same colour at half opacity, for overlaid bars.
pub fn translucent(c: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 128)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour of a scatter series: species keep their fixed colours, other
/// groupings take evenly spaced hues by position.
pub fn group_color(key: GroupKey, index: usize, n_groups: usize) -> Color32 {
    match key {
        GroupKey::Species(s) => species_color(s),
        GroupKey::Island(_) => generate_palette(n_groups)
            .get(index)
            .copied()
            .unwrap_or(Color32::GRAY),
    }
}
