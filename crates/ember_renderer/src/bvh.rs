//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared surfaces. Spans of one object alias the same
//! surface on both sides; spans of two hold them directly; larger spans are
//! sorted along the longest axis and split at the median index.

use crate::{HitRecord, Hittable, HittableList};
use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;
use std::sync::Arc;

/// One side of a branch.
///
/// Internal nodes are stored by value so traversal between them avoids
/// dynamic dispatch; only the leaves go through the trait object.
pub enum BvhChild {
    Node(Box<BvhNode>),
    Object(Arc<dyn Hittable>),
}

impl BvhChild {
    #[inline]
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            BvhChild::Node(node) => node.hit(ray, ray_t, rng),
            BvhChild::Object(object) => object.hit(ray, ray_t, rng),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhChild::Node(node) => node.bounding_box(),
            BvhChild::Object(object) => object.bounding_box(),
        }
    }
}

pub enum BvhNode {
    /// Internal node with two children (possibly the same surface).
    Branch {
        left: BvhChild,
        right: BvhChild,
        bbox: Aabb,
    },
    /// Empty node (built from an empty list).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of shared hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        let count = objects.len();
        let node = Self::build(&mut objects);
        log::debug!("Built BVH over {count} objects");
        node
    }

    /// Create a BVH over the objects of a list (the objects are shared, not copied).
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    /// Recursive BVH construction over a non-empty span.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        let axis = bounds.longest_axis();

        let (left, right) = match objects {
            [only] => (BvhChild::Object(only.clone()), BvhChild::Object(only.clone())),
            [first, second] => (BvhChild::Object(first.clone()), BvhChild::Object(second.clone())),
            _ => {
                // Stable sort by the minimum bound on the chosen axis
                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = objects.len() / 2;
                let (lower, upper) = objects.split_at_mut(mid);
                (
                    BvhChild::Node(Box::new(Self::build(lower))),
                    BvhChild::Node(Box::new(Self::build(upper))),
                )
            }
        };

        // Tight box over the children rather than the pre-split bounds
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch { left, right, bbox }
    }

    /// The two children of a branch node.
    pub fn children(&self) -> Option<(&BvhChild, &BvhChild)> {
        match self {
            BvhNode::Branch { left, right, .. } => Some((left, right)),
            BvhNode::Empty => None,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Material, Quad, Sphere};
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn random_scene(rng: &mut StdRng, count: usize) -> HittableList {
        let mut list = HittableList::new();
        for i in 0..count {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            if i % 3 == 0 {
                let u = Vec3::new(rng.gen_range(0.5..2.0), 0.0, rng.gen_range(-1.0..1.0));
                let v = Vec3::new(0.0, rng.gen_range(0.5..2.0), rng.gen_range(-1.0..1.0));
                list.add(Arc::new(Quad::new(center, u, v, grey())));
            } else {
                list.add(Arc::new(Sphere::new(center, rng.gen_range(0.2..1.5), grey())));
            }
        }
        list
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(bvh.hit(&ray, Interval::UNIVERSE, &mut rng).is_none());
    }

    #[test]
    fn test_bvh_single_object_aliases_both_children() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()));
        let bvh = BvhNode::new(vec![sphere.clone()]);

        match bvh.children() {
            Some((BvhChild::Object(left), BvhChild::Object(right))) => {
                assert!(Arc::ptr_eq(left, right));
                assert!(Arc::ptr_eq(left, &sphere));
            }
            _ => panic!("single object should build a leaf branch"),
        }

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_boxes_contain_children() {
        let mut rng = StdRng::seed_from_u64(3);
        let list = random_scene(&mut rng, 64);
        let root = BvhNode::from_list(&list);

        let mut stack: Vec<&BvhNode> = vec![&root];
        let mut branches = 0;
        while let Some(node) = stack.pop() {
            let (left, right) = node.children().expect("non-empty tree has only branches");
            let bbox = node.bounding_box();
            branches += 1;

            for child in [left, right] {
                assert!(bbox.contains_box(&child.bounding_box()));
                if let BvhChild::Node(inner) = child {
                    stack.push(inner);
                }
            }
        }

        assert!(branches >= 32);
        assert!(root.bounding_box().contains_box(&list.bounding_box()));
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let list = random_scene(&mut rng, 200);
        let bvh = BvhNode::from_list(&list);

        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let target = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let ray = Ray::new_simple(origin, target - origin);
            let ray_t = Interval::new(0.001, f32::INFINITY);

            let brute = list.hit(&ray, ray_t, &mut rng);
            let fast = bvh.hit(&ray, ray_t, &mut rng);

            match (brute, fast) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert_eq!(a.t, b.t);
                    assert_eq!(a.p, b.p);
                    assert_eq!(a.normal, b.normal);
                    assert_eq!((a.u, a.v), (b.u, b.v));
                    assert_eq!(a.front_face, b.front_face);
                }
                (a, b) => panic!("BVH disagrees with linear scan: {a:?} vs {b:?}"),
            }
        }
    }
}
