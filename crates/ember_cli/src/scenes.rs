//! The hard-coded demo scenes.
//!
//! Each scene returns its geometry already wrapped in a BVH together with
//! the camera settings it was composed for.

use clap::ValueEnum;
use ember_math::Vec3;
use ember_renderer::sampling::{gen_f32, gen_range, random_color, random_vec3};
use ember_renderer::{
    axis_box, BvhNode, CameraSettings, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight, Hittable,
    HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Quad, RotateY, Sphere, Texture, Translate,
};
use rand::RngCore;
use std::sync::Arc;

const SKY: Color = Color::new(0.70, 0.80, 1.00);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    BouncingSpheres,
    CheckeredSpheres,
    Earth,
    PerlinSpheres,
    Quads,
    SimpleLight,
    CornellBox,
    CornellSmoke,
}

/// A built scene: immutable geometry plus its camera.
pub struct Scene {
    pub world: BvhNode,
    pub settings: CameraSettings,
}

impl Scene {
    fn new(world: HittableList, settings: CameraSettings) -> Self {
        Self {
            world: BvhNode::from_list(&world),
            settings,
        }
    }
}

/// Build a scene. `rng` drives random placement and procedural textures.
pub fn build(kind: SceneKind, rng: &mut dyn RngCore) -> Scene {
    match kind {
        SceneKind::BouncingSpheres => bouncing_spheres(rng),
        SceneKind::CheckeredSpheres => checkered_spheres(),
        SceneKind::Earth => earth(),
        SceneKind::PerlinSpheres => perlin_spheres(rng),
        SceneKind::Quads => quads(),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

fn textured(texture: Arc<dyn Texture>) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_texture(texture))
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Wide-angle view from (13, 2, 3) used by the sphere scenes.
fn overview_camera() -> CameraSettings {
    CameraSettings::default()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(10, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(SKY)
}

fn bouncing_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, textured(checker()))));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(a as f32 + 0.9 * gen_f32(rng), 0.2, b as f32 + 0.9 * gen_f32(rng));

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_color(rng) * random_color(rng);
                let center2 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::moving(center, center2, 0.2, lambertian(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.4, 0.2, 0.1)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let settings = overview_camera().with_lens(20.0, 0.6, 10.0);
    Scene::new(world, settings)
}

fn checkered_spheres() -> Scene {
    let mut world = HittableList::new();
    let material = textured(checker());

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)));

    Scene::new(world, overview_camera())
}

fn earth() -> Scene {
    let surface = textured(Arc::new(ImageTexture::new("earthmap.jpg")));
    let world = HittableList::from_object(Arc::new(Sphere::new(Vec3::ZERO, 2.0, surface)));

    let settings = overview_camera().with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y);
    Scene::new(world, settings)
}

fn perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    let marble = textured(Arc::new(NoiseTexture::new(4.0, rng)));

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    Scene::new(world, overview_camera())
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lambertian(Color::new(0.2, 0.8, 0.8));

    let quads = [
        (Vec3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), left_red),
        (Vec3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), back_green),
        (Vec3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), right_blue),
        (Vec3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), upper_orange),
        (Vec3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), lower_teal),
    ];
    for (q, u, v, material) in quads {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }

    let settings = CameraSettings::default()
        .with_resolution(400, 1.0)
        .with_quality(10, 50)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(SKY);
    Scene::new(world, settings)
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    let marble = textured(Arc::new(NoiseTexture::new(4.0, rng)));

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone())));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    let settings = overview_camera()
        .with_quality(50, 50)
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_background(Color::ZERO);
    Scene::new(world, settings)
}

/// The five walls and ceiling light shared by both Cornell scenes.
fn cornell_room(white: &Arc<dyn Material>) -> HittableList {
    let mut world = HittableList::new();

    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let walls = [
        (Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red),
        (Vec3::new(343.0, 554.0, 332.0), Vec3::new(-130.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -105.0), light),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::new(555.0, 555.0, 555.0), Vec3::new(-555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -555.0), white.clone()),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white.clone()),
    ];
    for (q, u, v, material) in walls {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }

    world
}

/// A box with one corner at the origin, turned about Y, then moved into place.
fn placed_box(size: Vec3, degrees: f32, offset: Vec3, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
    let shape: Arc<dyn Hittable> = Arc::new(axis_box(Vec3::ZERO, size, material));
    let shape: Arc<dyn Hittable> = Arc::new(RotateY::new(shape, degrees));
    Arc::new(Translate::new(shape, offset))
}

fn cornell_camera() -> CameraSettings {
    CameraSettings::default()
        .with_resolution(600, 1.0)
        .with_quality(50, 50)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO)
}

fn cornell_box() -> Scene {
    let white = lambertian(Color::splat(0.73));
    let mut world = cornell_room(&white);

    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white,
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    )));

    let settings = cornell_camera().with_resolution(100, 1.0).with_quality(8000, 50);
    Scene::new(world, settings)
}

fn cornell_smoke() -> Scene {
    let white = lambertian(Color::splat(0.73));
    let mut world = cornell_room(&white);

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    );
    let short = placed_box(Vec3::splat(165.0), -18.0, Vec3::new(130.0, 0.0, 65.0), white);

    world.add(Arc::new(ConstantMedium::with_color(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::with_color(short, 0.01, Color::ONE)));

    Scene::new(world, cornell_camera())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::{Camera, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [SceneKind; 8] = [
        SceneKind::BouncingSpheres,
        SceneKind::CheckeredSpheres,
        SceneKind::Earth,
        SceneKind::PerlinSpheres,
        SceneKind::Quads,
        SceneKind::SimpleLight,
        SceneKind::CornellBox,
        SceneKind::CornellSmoke,
    ];

    #[test]
    fn test_every_scene_builds_a_valid_camera() {
        for kind in ALL {
            let mut rng = StdRng::seed_from_u64(0);
            let scene = build(kind, &mut rng);
            assert!(Camera::new(&scene.settings).is_ok(), "{kind:?}");
        }
    }

    #[test]
    fn test_view_direction_hits_geometry() {
        for kind in ALL {
            let mut rng = StdRng::seed_from_u64(0);
            let scene = build(kind, &mut rng);
            let settings = &scene.settings;

            let ray = Ray::new_simple(settings.look_from, settings.look_at - settings.look_from);
            let hit = scene.world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng);
            assert!(hit.is_some(), "{kind:?} camera looks at nothing");
        }
    }

    #[test]
    fn test_cornell_box_defaults() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = build(SceneKind::CornellBox, &mut rng);
        assert_eq!(scene.settings.image_width, 100);
        assert_eq!(scene.settings.samples_per_pixel, 8000);
        assert_eq!(scene.settings.background, Color::ZERO);
    }

    #[test]
    fn test_bouncing_spheres_is_seeded() {
        let a = build(SceneKind::BouncingSpheres, &mut StdRng::seed_from_u64(4));
        let b = build(SceneKind::BouncingSpheres, &mut StdRng::seed_from_u64(4));
        assert_eq!(a.world.bounding_box(), b.world.bounding_box());
    }
}
