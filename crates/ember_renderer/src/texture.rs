//! Textures: pure functions from (u, v, point) to color.

use crate::error::Result;
use crate::{Color, ImageData, Perlin};
use ember_math::{Interval, Vec3};
use rand::RngCore;
use std::path::Path;
use std::sync::Arc;

/// Turbulence octaves used by the marble pattern.
const NOISE_OCTAVES: u32 = 7;

/// Color returned by image textures whose image failed to load.
pub const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checkerboard alternating between two sub-textures.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one checker cell in world units.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(scale, Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if parity.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like pattern: a sine along z phase-shifted by turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, NOISE_OCTAVES);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}

/// A texture sampled from a decoded image by (u, v).
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    /// Load an image, substituting a cyan debug color if it cannot be read.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = ImageData::load(path).unwrap_or_else(|err| {
            log::warn!("Image texture {} unavailable, rendering cyan: {err}", path.display());
            ImageData::empty()
        });
        Self { image }
    }

    /// Load an image, failing if it cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            image: ImageData::load(path)?,
        })
    }

    pub fn from_image(image: ImageData) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if !self.image.is_loaded() {
            return MISSING_IMAGE_COLOR;
        }

        let u = Interval::UNIT.clamp(u);
        // Flip V to image row order
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = (u * self.image.width() as f32) as u32;
        let j = (v * self.image.height() as f32) as u32;
        let [r, g, b] = self.image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EVEN: Color = Color::new(0.2, 0.3, 0.1);
    const ODD: Color = Color::new(0.9, 0.9, 0.9);

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::rgb(0.1, 0.2, 0.3);
        assert_eq!(tex.value(0.7, 0.1, Vec3::splat(9.0)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_parity() {
        let scale = 0.5;
        let checker = CheckerTexture::from_colors(scale, EVEN, ODD);
        let origin = Vec3::ZERO;

        assert_eq!(checker.value(0.0, 0.0, origin), EVEN);

        // One full period (two cells) along an axis returns to the same color
        assert_eq!(checker.value(0.0, 0.0, origin + Vec3::new(2.0 * scale, 0.0, 0.0)), EVEN);
        assert_eq!(checker.value(0.0, 0.0, origin + Vec3::new(0.0, 0.0, 2.0 * scale)), EVEN);

        // Half a period (one cell) flips it
        assert_eq!(checker.value(0.0, 0.0, origin + Vec3::new(scale, 0.0, 0.0)), ODD);
        assert_eq!(checker.value(0.0, 0.0, origin + Vec3::new(0.0, scale, 0.0)), ODD);

        // Negative cells keep alternating
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-0.25, 0.0, 0.0)), ODD);
    }

    #[test]
    fn test_noise_texture_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let tex = NoiseTexture::new(4.0, &mut rng);

        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.13, 0.7, i as f32 * -0.29);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0 + 1e-6);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_image_texture_missing_is_cyan() {
        let tex = ImageTexture::new("no_such_texture_file.jpg");
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_IMAGE_COLOR);

        assert!(ImageTexture::open("no_such_texture_file.jpg").is_err());
    }

    #[test]
    fn test_image_texture_flips_v() {
        // 1x2 image: top row red, bottom row blue
        let image = ImageData::from_rgb8(1, 2, vec![255, 0, 0, 0, 0, 255]).unwrap();
        let tex = ImageTexture::from_image(image);

        assert_eq!(tex.value(0.5, 0.9, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.5, 0.1, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));

        // Out-of-range coordinates clamp instead of wrapping
        assert_eq!(tex.value(-3.0, 5.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(2.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
    }
}
