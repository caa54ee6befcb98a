//! Homogeneous participating medium (smoke, fog) bounded by a convex surface.

use crate::sampling::gen_f32;
use crate::{Color, HitRecord, Hittable, Isotropic, Material, Texture};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Offset applied after the entry point so the exit search skips it.
const BOUNDARY_EPSILON: f32 = 0.0001;

pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::from_texture(texture)),
        }
    }

    pub fn with_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + BOUNDARY_EPSILON, f32::INFINITY), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Normal and face are arbitrary: the isotropic phase function ignores them
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_ball() -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Lambertian::new(Vec3::ONE))))
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        let fog = ConstantMedium::with_color(unit_ball(), 1000.0, Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);

        for _ in 0..100 {
            let rec = fog
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .expect("dense fog should almost surely scatter");
            assert!(rec.t >= 4.0 && rec.t <= 6.0);
            assert!(rec.front_face);
        }
    }

    #[test]
    fn test_thin_medium_is_mostly_transparent() {
        let fog = ConstantMedium::with_color(unit_ball(), 1e-6, Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);

        let hits = (0..1000)
            .filter(|_| fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).is_some())
            .count();
        assert!(hits < 5);
    }

    #[test]
    fn test_medium_misses_when_boundary_missed() {
        let fog = ConstantMedium::with_color(unit_ball(), 1000.0, Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new_simple(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z);

        assert!(fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).is_none());
        assert_eq!(fog.bounding_box(), unit_ball().bounding_box());
    }

    #[test]
    fn test_medium_from_inside_starts_at_origin() {
        let fog = ConstantMedium::with_color(unit_ball(), 1000.0, Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(9);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();
        assert!(rec.t > 0.0 && rec.t < 1.0);
    }
}
