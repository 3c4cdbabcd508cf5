//! Penumbra Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a scene graph of hittable primitives,
//! instance transforms and participating media, accelerated by a BVH and
//! rendered in parallel buckets.
//!
//! Every random decision draws from a generator passed in by the caller;
//! the renderer gives each bucket its own seeded generator so images are
//! reproducible.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod perlin;
mod rect;
mod renderer;
mod sphere;
mod transform;

pub mod sampling;
pub mod texture;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhError, BvhNode, BvhResult};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, reflectance, refract, Color, Dielectric, DiffuseLight, DiffuseMode, Isotropic,
    Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use rect::{Cuboid, Rect};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, ray_color_sky, render, render_pixel,
    render_with_cancel, sky_gradient, Background, ImageBuffer, RenderConfig, RenderError,
    RenderResult,
};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{Rotate, Translate};

/// Re-export Vec3 and common math types from penumbra_math
pub use penumbra_math::{Aabb, Axis, Interval, Point3, Ray, Vec3};
