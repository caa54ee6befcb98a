//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering of small,
//! hard-coded scenes: spheres, quads, boxes, instancing wrappers and
//! constant-density volumes, accelerated by a BVH and rendered in parallel
//! over scanlines.

pub mod error;
pub mod sampling;

mod bvh;
mod camera;
mod hittable;
mod image_data;
mod instance;
mod material;
mod medium;
mod perlin;
mod quad;
mod renderer;
mod scanline;
mod sphere;
mod texture;

pub use bvh::{BvhChild, BvhNode};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, Result};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_data::{ImageData, IMAGE_DIR_ENV};
pub use instance::{RotateY, Translate};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use quad::{axis_box, Quad};
pub use renderer::{color_to_rgb, linear_to_gamma, ray_color, render_pixel, ImageBuffer, SHADOW_ACNE_EPSILON};
pub use scanline::{partition_rows, row_seed, RenderOptions, Renderer, RowRange};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, MISSING_IMAGE_COLOR};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
