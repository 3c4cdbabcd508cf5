//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use penumbra_math::Vec3;
use penumbra_renderer::sampling::{gen_f32, gen_range, random_vec3};
use penumbra_renderer::{
    Background, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, MovingSphere,
    NoiseTexture, Rect, Rotate, Sphere, Translate,
};
use rand::RngCore;

use crate::cli::SceneKind;

/// Everything a render needs besides settings.
pub struct Scene {
    pub world: HittableList,
    /// Positioned camera; resolution is applied by the caller
    pub camera: Camera,
    pub background: Background,
    /// Aspect ratio the scene is framed for, if it needs one
    pub aspect_ratio: Option<f32>,
}

impl Scene {
    fn new(world: HittableList, camera: Camera, background: Background) -> Self {
        Self {
            world,
            camera,
            background,
            aspect_ratio: None,
        }
    }

    fn square(mut self) -> Self {
        self.aspect_ratio = Some(1.0);
        self
    }
}

const SKY_BLUE: Color = Color::new(0.70, 0.80, 1.00);

/// Build the named scene. Random placement draws from `rng`.
pub fn build(kind: SceneKind, earth_texture: &Path, rng: &mut dyn RngCore) -> Result<Scene> {
    let scene = match kind {
        SceneKind::RandomSpheres => random_spheres(rng),
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(rng),
        SceneKind::Earth => earth(earth_texture),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::Final => final_scene(earth_texture, rng)?,
    };

    log::info!("Built scene {:?} with {} top-level objects", kind, scene.world.len());
    Ok(scene)
}

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(color))
}

fn light(color: Color) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::new(color))
}

fn default_view(look_from: Vec3, look_at: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, 0.0, 10.0)
}

fn random_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let checker = CheckerTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(Arc::new(checker))),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    lambertian(albedo),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_shutter(0.0, 1.0);

    Scene::new(world, camera, Background::Sky)
}

fn two_spheres() -> Scene {
    let checker: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(
        CheckerTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9)),
    )));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)));

    let camera = default_view(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0);
    Scene::new(world, camera, Background::Solid(SKY_BLUE))
}

fn perlin_ground_and_ball(world: &mut HittableList, rng: &mut dyn RngCore) {
    let marble: Arc<dyn Material> =
        Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(rng, 4.0))));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_ball(&mut world, rng);

    let camera = default_view(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0);
    Scene::new(world, camera, Background::Solid(SKY_BLUE))
}

fn earth(earth_texture: &Path) -> Scene {
    let surface = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::load(earth_texture))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::ZERO, 2.0, surface)));

    let camera = default_view(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0);
    Scene::new(world, camera, Background::Solid(SKY_BLUE))
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_ball(&mut world, rng);

    let lamp = light(Color::new(4.0, 4.0, 4.0));
    world.add(Arc::new(Rect::xy(3.0, 5.0, 1.0, 3.0, -2.0, lamp.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, lamp)));

    let camera = default_view(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0);
    Scene::new(world, camera, Background::Solid(Color::ZERO))
}

/// Walls of the 555-unit Cornell room, without the light.
fn cornell_walls(world: &mut HittableList) -> Arc<dyn Material> {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.add(Arc::new(Rect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    world.add(Arc::new(Rect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    world.add(Arc::new(Rect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())));
    world.add(Arc::new(Rect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));
    world.add(Arc::new(Rect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));

    white
}

/// The tall and short blocks, rotated and placed in the room.
fn cornell_blocks(white: Arc<dyn Material>) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let tall: Arc<dyn Hittable> = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall = Arc::new(Rotate::y(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white));
    let short = Arc::new(Rotate::y(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera() -> Camera {
    default_view(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), 40.0)
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);
    world.add(Arc::new(Rect::xz(
        213.0,
        343.0,
        227.0,
        332.0,
        554.0,
        light(Color::splat(15.0)),
    )));

    let (tall, short) = cornell_blocks(white);
    world.add(tall);
    world.add(short);

    Scene::new(world, cornell_camera(), Background::Solid(Color::ZERO)).square()
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);
    world.add(Arc::new(Rect::xz(
        113.0,
        443.0,
        127.0,
        432.0,
        554.0,
        light(Color::splat(7.0)),
    )));

    let (tall, short) = cornell_blocks(white);
    world.add(Arc::new(ConstantMedium::with_color(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::with_color(short, 0.01, Color::ONE)));

    Scene::new(world, cornell_camera(), Background::Solid(Color::ZERO)).square()
}

fn final_scene(earth_texture: &Path, rng: &mut dyn RngCore) -> Result<Scene> {
    let mut ground_boxes = HittableList::new();
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range(rng, 1.0, 101.0);
            ground_boxes.add(Arc::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::from_list(&ground_boxes, 0.0, 1.0, rng)?));

    world.add(Arc::new(Rect::xz(
        123.0,
        423.0,
        147.0,
        412.0,
        554.0,
        light(Color::splat(7.0)),
    )));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(MovingSphere::new(
        center0,
        center1,
        0.0,
        1.0,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::with_color(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));

    let haze: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5))));
    world.add(Arc::new(ConstantMedium::with_color(haze, 0.0001, Color::ONE)));

    let globe = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::load(earth_texture))));
    world.add(Arc::new(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, globe)));

    let marble = Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(rng, 0.1))));
    world.add(Arc::new(Sphere::new(Vec3::new(220.0, 280.0, 300.0), 80.0, marble)));

    let white = lambertian(Color::splat(0.73));
    let cluster: HittableList = (0..1000)
        .map(|_| {
            let sphere: Arc<dyn Hittable> =
                Arc::new(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white.clone()));
            sphere
        })
        .collect();
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&cluster, 0.0, 1.0, rng)?);
    world.add(Arc::new(Translate::new(
        Arc::new(Rotate::y(cluster, 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    let camera = default_view(Vec3::new(478.0, 278.0, -600.0), Vec3::new(278.0, 278.0, 0.0), 40.0)
        .with_shutter(0.0, 1.0);

    Ok(Scene::new(world, camera, Background::Solid(Color::ZERO)).square())
}
