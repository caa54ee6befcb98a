//! Camera for ray generation.

use crate::error::{RenderError, Result};
use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::Color;
use ember_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// User-facing camera and quality settings.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// settings file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Width over height
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per camera ray
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,

    /// Radiance returned by rays that escape the scene
    pub background: Color,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Color::new(0.7, 0.8, 1.0),
        }
    }
}

impl CameraSettings {
    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.image_width == 0 {
            return Err(RenderError::InvalidSettings("image width must be positive".into()));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings("samples per pixel must be positive".into()));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(RenderError::InvalidSettings(format!(
                "aspect ratio must be finite and positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.look_from == self.look_at {
            return Err(RenderError::InvalidSettings(
                "look_from and look_at must differ".into(),
            ));
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() < 1e-12 {
            return Err(RenderError::InvalidSettings(
                "vup must not be parallel to the view direction".into(),
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidSettings(format!(
                "vertical field of view must lie in (0, 180), got {}",
                self.vfov
            )));
        }
        if !self.focus_dist.is_finite() || self.focus_dist <= 0.0 {
            return Err(RenderError::InvalidSettings(format!(
                "focus distance must be finite and positive, got {}",
                self.focus_dist
            )));
        }
        Ok(())
    }
}

/// Camera for generating rays into the scene.
///
/// All derived data is computed once in [`Camera::new`]; the camera is
/// immutable afterwards and shared by every render worker.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: Color,

    defocus_angle: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Validate the settings and derive the viewing geometry.
    pub fn new(settings: &CameraSettings) -> Result<Self> {
        settings.validate()?;

        let image_width = settings.image_width;
        let image_height = ((image_width as f32 / settings.aspect_ratio) as u32).max(1);
        let center = settings.look_from;

        // Calculate viewport dimensions
        let theta = settings.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * settings.focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        // Calculate pixel delta vectors
        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = center - settings.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = settings.focus_dist * (settings.defocus_angle / 2.0).to_radians().tan();

        Ok(Self {
            image_width,
            image_height,
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            background: settings.background,
            defocus_angle: settings.defocus_angle,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            samples_scale: 1.0 / settings.samples_per_pixel as f32,
        })
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray originates from the defocus disk and is directed at a randomly
    /// sampled point around the pixel location. Its time is uniform in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Orthonormal camera frame `(u, v, w)`; `w` points away from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}
