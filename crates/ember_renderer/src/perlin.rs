//! Gradient (Perlin) noise with turbulence.

use crate::sampling::{gen_int, random_vec3};
use ember_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Lattice of random unit gradients addressed through three permutation tables.
pub struct Perlin {
    randvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let randvec = (0..POINT_COUNT)
            .map(|_| random_vec3(rng, -1.0, 1.0).normalize_or_zero())
            .collect();

        Self {
            randvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Smoothly interpolated noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.randvec[index];
                }
            }
        }

        Self::perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves, each at double frequency and half weight.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0_f32;
        let mut temp = p;
        let mut weight = 1.0_f32;

        for _ in 0..depth {
            accum += weight * self.noise(temp);
            weight *= 0.5;
            temp *= 2.0;
        }

        accum.abs()
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut p: Vec<usize> = (0..POINT_COUNT).collect();

        // Fisher-Yates shuffle
        for i in (1..POINT_COUNT).rev() {
            let target = gen_int(rng, 0, i as i32) as usize;
            p.swap(i, target);
        }
        p
    }

    fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
        // Hermite smoothing
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut accum = 0.0_f32;
        for (i, plane) in c.iter().enumerate() {
            let fi = i as f32;
            for (j, row) in plane.iter().enumerate() {
                let fj = j as f32;
                for (k, gradient) in row.iter().enumerate() {
                    let fk = k as f32;
                    let weight = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * gradient.dot(weight);
                }
            }
        }
        accum
    }
}
