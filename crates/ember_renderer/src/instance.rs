//! Rigid transform wrappers.
//!
//! Each wrapper moves the incoming ray into object space, delegates to the
//! wrapped surface, then moves the hit point and normal back to world space.

use crate::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A surface displaced by a constant offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self { object, offset, bbox }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let mut rec = self.object.hit(&ray.translated(self.offset), ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A surface rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `degrees` (counter-clockwise looking down -Y).
    pub fn new(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let bbox = Mat4::from_rotation_y(radians).transform_aabb(&object.bounding_box());

        Self {
            object,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox,
        }
    }

    #[inline]
    fn world_to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    fn object_to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let rotated = Ray::new(
            self.world_to_object(ray.origin()),
            self.world_to_object(ray.direction()),
            ray.time(),
        );

        // front_face is invariant under rotation, so only p and normal move
        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.object_to_world(rec.p);
        rec.normal = self.object_to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
