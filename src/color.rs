use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

// ---------------------------------------------------------------------------
// Color mapping: entity name → Color32
// ---------------------------------------------------------------------------

/// Assigns each entity a colour by its position, so colours stay put
/// no matter which subset is being drawn.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn for_entities<'a>(entities: impl ExactSizeIterator<Item = &'a str>) -> Self {
        let palette = generate_palette(entities.len());
        let mapping = entities
            .zip(palette)
            .map(|(e, c)| (e.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, entity: &str) -> Color32 {
        self.mapping
            .get(entity)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(13);
        assert_eq!(palette.len(), 13);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_entities_fall_back_to_grey() {
        let names = ["Emirates", "Qatar Airways"];
        let map = ColorMap::for_entities(names.iter().copied());
        assert_ne!(map.color_for("Emirates"), map.color_for("Qatar Airways"));
        assert_eq!(map.color_for("Nobody"), Color32::GRAY);
    }
}
