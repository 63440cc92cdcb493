//! 8-bit RGBA color used for strokes and backgrounds.
//!
//! Colors go straight into SVG attributes and PNG pixels, both of which are
//! 8-bit per channel, so the type stores bytes rather than floats.

/// An 8-bit sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey of the given intensity.
    pub const fn gray(intensity: u8) -> Self {
        Self::rgb(intensity, intensity, intensity)
    }

    /// Position-dependent grey used to shade particles and ridges:
    /// intensity `floor((sin(x*f + y*f) + 1) * 127)`, always in `0..=254`.
    pub fn sine_gray(x: f64, y: f64, frequency: f64) -> Self {
        let intensity = ((x * frequency + y * frequency).sin() + 1.0) * 127.0;
        Self::gray(intensity.floor().clamp(0.0, 254.0) as u8)
    }

    /// Returns the same color with alpha taken from a fraction in [0, 1].
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Alpha as a fraction in [0, 1].
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `"#rrggbb"`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Source-over compositing of `self` onto an opaque `dst`, scaled by an
    /// extra `coverage` factor in [0, 1].
    pub fn blend_over(self, dst: [u8; 3], coverage: f64) -> [u8; 3] {
        let alpha = self.opacity() * coverage.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| -> u8 {
            (f64::from(s) * alpha + f64::from(d) * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        [mix(self.r, dst[0]), mix(self.g, dst[1]), mix(self.b, dst[2])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_hex_formats_lowercase_two_digit_channels() {
        assert_eq!(Rgba::rgb(64, 64, 64).to_hex(), "#404040");
        assert_eq!(Rgba::rgb(0, 0, 139).to_hex(), "#00008b");
        assert_eq!(Rgba::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn opacity_maps_alpha_to_unit_interval() {
        assert_eq!(Rgba::BLACK.opacity(), 1.0);
        assert_eq!(Rgba::rgba(0, 0, 0, 0).opacity(), 0.0);
        assert!((Rgba::rgba(64, 64, 64, 180).opacity() - 180.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn with_opacity_rounds_to_nearest_byte() {
        assert_eq!(Rgba::BLACK.with_opacity(0.7).a, 179);
        assert_eq!(Rgba::BLACK.with_opacity(2.0).a, 255);
    }

    #[test]
    fn sine_gray_at_origin_is_mid_grey() {
        // sin(0) = 0 -> (0 + 1) * 127 = 127
        assert_eq!(Rgba::sine_gray(0.0, 0.0, 0.01), Rgba::gray(127));
    }

    #[test]
    fn sine_gray_peaks_at_quarter_period() {
        // x*f + y*f = PI/2 -> intensity 254
        let x = std::f64::consts::FRAC_PI_2 / 0.1;
        assert_eq!(Rgba::sine_gray(x, 0.0, 0.1), Rgba::gray(254));
    }

    #[test]
    fn blend_over_respects_alpha_and_coverage() {
        let white = [255, 255, 255];
        assert_eq!(Rgba::BLACK.blend_over(white, 1.0), [0, 0, 0]);
        assert_eq!(Rgba::BLACK.blend_over(white, 0.0), white);
        let half = Rgba::rgba(0, 0, 0, 255).blend_over(white, 0.5);
        assert_eq!(half, [128, 128, 128]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sine_gray_is_always_a_valid_grey(x in -1e6_f64..1e6, y in -1e6_f64..1e6, f in 0.0_f64..1.0) {
                let c = Rgba::sine_gray(x, y, f);
                prop_assert!(c.r == c.g && c.g == c.b);
                prop_assert!(c.r <= 254);
                prop_assert_eq!(c.a, 255);
            }
        }
    }
}
