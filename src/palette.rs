//! Satellite color palette and the random source that picks from it.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// RGB color with float components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Fallback color for edges whose endpoints carry no color
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Linear interpolation toward `other` at parameter `t` in [0, 1]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

/// Default satellite palette
pub fn default_palette() -> Vec<Rgb> {
    vec![
        Rgb::from_u8(0x1f, 0x77, 0xb4), // blue
        Rgb::from_u8(0xff, 0x7f, 0x0e), // orange
        Rgb::from_u8(0x2c, 0xa0, 0x2c), // green
        Rgb::from_u8(0xd6, 0x27, 0x28), // red
        Rgb::from_u8(0x94, 0x67, 0xbd), // purple
        Rgb::from_u8(0x8c, 0x56, 0x4b), // brown
        Rgb::from_u8(0xe3, 0x77, 0xc2), // pink
        Rgb::from_u8(0xbc, 0xbd, 0x22), // olive
        Rgb::from_u8(0x17, 0xbe, 0xcf), // cyan
    ]
}

/// Random color picker. Seedable for reproducible runs; unseeded by default
/// so production colors stay free.
pub struct ColorSource {
    rng: StdRng,
}

impl ColorSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform pick from a non-empty palette
    pub fn pick(&mut self, palette: &[Rgb]) -> Rgb {
        palette[self.rng.gen_range(0..palette.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::{default_palette, ColorSource, Rgb};

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0.0, 0.0, 0.0);
        let b = Rgb::new(1.0, 0.5, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < f32::EPSILON);
        assert!((mid.g - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn seeded_source_is_deterministic() {
        let palette = default_palette();
        let mut a = ColorSource::new(Some(7));
        let mut b = ColorSource::new(Some(7));
        for _ in 0..32 {
            assert_eq!(a.pick(&palette), b.pick(&palette));
        }
    }

    #[test]
    fn picks_stay_in_palette() {
        let palette = default_palette();
        let mut source = ColorSource::new(None);
        for _ in 0..64 {
            let color = source.pick(&palette);
            assert!(palette.contains(&color));
        }
    }
}
