//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Depth-limited recursive ray tracing (no Russian roulette)
//! - Emission from light materials and a constant background
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::error::Result;
use crate::{Camera, Color, Hittable};
use ember_math::{Interval, Ray};
use rand::RngCore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Lower bound of the hit interval, avoids re-hitting the surface just left.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Channel range before quantization; keeps 1.0 from rounding up to 256.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), rng) else {
        return background;
    };

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed: only what the surface emits
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel: the mean of `samples_per_pixel` path samples.
pub fn render_pixel(camera: &Camera, world: &dyn Hittable, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Linear color buffer for render output, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Write a plain-text (P3) PPM stream.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "P3\n{} {}\n255\n", self.width, self.height)?;
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb(*color);
            writeln!(writer, "{r} {g} {b}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save to disk, as PPM for `.ppm` paths and through the `image` crate otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_ppm(&mut writer)?;
        } else {
            image::save_buffer(path, &self.to_rgb8(), self.width, self.height, image::ColorType::Rgb8)?;
        }

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, DiffuseLight, HittableList, Lambertian, Material, Quad, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single_sphere() -> HittableList {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        HittableList::from_object(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material)))
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(40.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.25, -3.0, 1.0)), [128, 0, 255]);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = single_sphere();
        let mut rng = StdRng::seed_from_u64(1);

        for dir in [-Vec3::Z, Vec3::Z, Vec3::Y] {
            let ray = Ray::new_simple(Vec3::ZERO, dir);
            assert_eq!(ray_color(&ray, &world, 0, Color::ONE, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_miss_returns_background() {
        let world = single_sphere();
        let mut rng = StdRng::seed_from_u64(1);
        let background = Color::new(0.1, 0.2, 0.3);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        assert_eq!(ray_color(&ray, &world, 5, background, &mut rng), background);
    }

    #[test]
    fn test_light_hit_returns_emission() {
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(3.0)));
        let world = HittableList::from_object(Arc::new(Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            light,
        )));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        assert_eq!(ray_color(&ray, &world, 1, Color::ZERO, &mut rng), Color::splat(3.0));
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let world = single_sphere();
        let settings = CameraSettings::default()
            .with_resolution(10, 1.0)
            .with_quality(4, 5)
            .with_background(Color::ZERO);
        let camera = Camera::new(&settings).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel sees the sphere, which only reflects a black sky
        assert_eq!(render_pixel(&camera, &world, 5, 5, &mut rng), Color::ZERO);

        let sky = Camera::new(&settings.with_background(Color::ONE)).unwrap();
        let color = render_pixel(&sky, &world, 5, 5, &mut rng);
        assert!(color.length() > 0.0);
        assert!(color.x < 1.0);
    }

    #[test]
    fn test_write_ppm_format() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::new(1.0, 0.25, 0.0));
        assert_eq!(image.get(1, 0), Color::new(1.0, 0.25, 0.0));

        let mut out = Vec::new();
        image.write_ppm(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n0 0 0\n255 128 0\n");
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = std::env::temp_dir().join(format!("ember_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        let png = dir.join("out.png");
        image.save(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), image.to_rgb8());

        let ppm = dir.join("out.ppm");
        image.save(&ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n3 2\n255\n"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
