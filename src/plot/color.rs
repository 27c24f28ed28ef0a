use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Colour helpers
// ---------------------------------------------------------------------------

/// Fill for cells whose coefficient is undefined.
pub const UNDEFINED: RGBColor = RGBColor(200, 200, 200);

/// Series colour for the scatter and histogram charts.
pub const SERIES: RGBColor = RGBColor(49, 115, 174);

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> RGBColor {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging colormap: correlation coefficient → RGBColor
// ---------------------------------------------------------------------------

/// Maps a coefficient in `[-1, 1]` to a diverging blue–white–red scale.
/// Strength darkens the colour; NaN maps to [`UNDEFINED`].
#[derive(Debug, Clone, Copy)]
pub struct DivergingMap {
    negative_hue: f32,
    positive_hue: f32,
}

impl Default for DivergingMap {
    fn default() -> Self {
        Self {
            negative_hue: 220.0,
            positive_hue: 5.0,
        }
    }
}

impl DivergingMap {
    pub fn color_for(&self, r: f64) -> RGBColor {
        if r.is_nan() {
            return UNDEFINED;
        }
        let t = r.clamp(-1.0, 1.0) as f32;
        let hue = if t < 0.0 {
            self.negative_hue
        } else {
            self.positive_hue
        };
        // |t| = 0 is near white, |t| = 1 is a deep tone.
        let lightness = 0.97 - 0.6 * t.abs();
        hsl_to_rgb(hue, 0.75, lightness)
    }

    /// Annotation colour that stays readable on top of `color_for(r)`.
    pub fn text_color_for(&self, r: f64) -> RGBColor {
        if r.abs() > 0.6 {
            RGBColor(255, 255, 255)
        } else {
            RGBColor(0, 0, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brightness(c: RGBColor) -> u32 {
        c.0 as u32 + c.1 as u32 + c.2 as u32
    }

    #[test]
    fn zero_is_near_white() {
        let c = DivergingMap::default().color_for(0.0);
        assert!(brightness(c) > 3 * 240, "{c:?}");
    }

    #[test]
    fn sign_picks_the_hue() {
        let map = DivergingMap::default();
        let pos = map.color_for(0.9);
        let neg = map.color_for(-0.9);
        assert!(pos.0 > pos.2, "positive should be red: {pos:?}");
        assert!(neg.2 > neg.0, "negative should be blue: {neg:?}");
    }

    #[test]
    fn strength_darkens() {
        let map = DivergingMap::default();
        assert!(brightness(map.color_for(1.0)) < brightness(map.color_for(0.3)));
        assert!(brightness(map.color_for(-1.0)) < brightness(map.color_for(-0.3)));
    }

    #[test]
    fn nan_is_grey() {
        let c = DivergingMap::default().color_for(f64::NAN);
        assert_eq!((c.0, c.1, c.2), (200, 200, 200));
    }
}
