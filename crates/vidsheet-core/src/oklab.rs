//! Oklab perceptual color space
//!
//! Cluster distances are computed in Oklab rather than gamma-encoded sRGB:
//! Euclidean distance in Oklab tracks perceived color difference, so the
//! quantizer groups colors the way a viewer would. Conversion matrices are
//! Björn Ottosson's 2021-01-25 revision.

use crate::color::Rgb;

/// A color in Oklab space.
///
/// `l` is lightness (0.0 black to 1.0 white); `a` and `b` are the
/// green-red and blue-yellow opponent axes, near zero for neutral grays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Oklab {
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Oklab { l, a, b }
    }

    /// Convert an 8-bit sRGB color to Oklab.
    pub fn from_rgb(c: Rgb) -> Self {
        let r = gamma_decode(c.r as f32 / 255.0);
        let g = gamma_decode(c.g as f32 / 255.0);
        let b = gamma_decode(c.b as f32 / 255.0);

        // Linear sRGB -> LMS, cube root, LMS -> Lab
        let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
        let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
        let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }

    /// Convert back to 8-bit sRGB, clamping out-of-gamut values.
    pub fn to_rgb(self) -> Rgb {
        let l_ = self.l + 0.3963377774 * self.a + 0.2158037573 * self.b;
        let m_ = self.l - 0.1055613458 * self.a - 0.0638541728 * self.b;
        let s_ = self.l - 0.0894841775 * self.a - 1.2914855480 * self.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
        let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
        let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

        Rgb {
            r: encode_channel(r),
            g: encode_channel(g),
            b: encode_channel(b),
        }
    }

    /// Squared Euclidean distance (the quantizer's perceptual metric).
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

/// sRGB gamma expansion per IEC 61966-2-1.
#[inline]
fn gamma_decode(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma compression per IEC 61966-2-1.
#[inline]
fn gamma_encode(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn encode_channel(linear: f32) -> u8 {
    (gamma_encode(linear.clamp(0.0, 1.0)) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_is_neutral() {
        for v in [0u8, 64, 128, 200, 255] {
            let lab = Oklab::from_rgb(Rgb::new(v, v, v));
            assert!(lab.a.abs() < 1e-3, "gray {v} has chroma a={}", lab.a);
            assert!(lab.b.abs() < 1e-3, "gray {v} has chroma b={}", lab.b);
        }
        assert!(Oklab::from_rgb(Rgb::BLACK).l.abs() < 1e-4);
        assert!((Oklab::from_rgb(Rgb::WHITE).l - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_within_one_lsb() {
        // A coarse sweep of the cube; every channel must survive the
        // round trip with at most 1 LSB of error.
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(51) {
                    let c = Rgb::new(r as u8, g as u8, b as u8);
                    let back = Oklab::from_rgb(c).to_rgb();
                    for (orig, got) in [(c.r, back.r), (c.g, back.g), (c.b, back.b)] {
                        let err = (orig as i32 - got as i32).abs();
                        assert!(err <= 1, "{c} round-tripped to {back}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_matches_palette_crate() {
        use palette::{IntoColor, Oklab as PaletteOklab, Srgb};

        let samples = [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(128, 128, 128),
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 0),
            Rgb::new(200, 40, 170),
        ];

        for c in samples {
            let ours = Oklab::from_rgb(c);
            let srgb = Srgb::new(
                c.r as f32 / 255.0,
                c.g as f32 / 255.0,
                c.b as f32 / 255.0,
            );
            let reference: PaletteOklab = srgb.into_linear().into_color();

            assert!((ours.l - reference.l).abs() < 1e-3, "{c} L mismatch");
            assert!((ours.a - reference.a).abs() < 1e-3, "{c} a mismatch");
            assert!((ours.b - reference.b).abs() < 1e-3, "{c} b mismatch");
        }
    }

    #[test]
    fn test_distance_orders_perceptually() {
        let red = Oklab::from_rgb(Rgb::new(255, 0, 0));
        let dark_red = Oklab::from_rgb(Rgb::new(200, 0, 0));
        let blue = Oklab::from_rgb(Rgb::new(0, 0, 255));

        assert!(red.distance_squared(dark_red) < red.distance_squared(blue));
        assert_eq!(red.distance_squared(red), 0.0);
    }
}
