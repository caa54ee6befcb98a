// Transform utilities for Mat4
//
// Extends glam::Mat4 with box transforms for instanced surfaces.
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    ///
    /// Computes the bounding box of all 8 transformed corners, which is required
    /// for any transform that does not preserve axes (rotations).
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let lo = aabb.min_point();
        let hi = aabb.max_point();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in 0..8 {
            let p = Vec3::new(
                if corner & 1 == 0 { lo.x } else { hi.x },
                if corner & 2 == 0 { lo.y } else { hi.y },
                if corner & 4 == 0 { lo.z } else { hi.z },
            );
            let transformed = self.transform_point3(p);
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }

        Aabb::from_points(result_min, result_max)
    }
}
