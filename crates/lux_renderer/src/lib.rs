//! Lux Renderer - CPU recursive ray tracing.
//!
//! Phong local illumination with stratified soft shadows, mirror reflection
//! and straight pass-through transparency over a linear scan of spheres,
//! axis-aligned cubes and infinite planes.

mod bucket;
mod camera;
mod cube;
mod hittable;
mod plane;
mod query;
mod renderer;
mod shading;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use query::{attenuated_visibility, closest_hit, is_visible};
pub use renderer::{
    clamp_color, color_to_rgb, render, render_pixel, ImageBuffer, RenderConfig, RenderError,
};
pub use shading::{Tracer, MAX_DEPTH_CEILING};

/// Re-export the math and scene types the renderer works with
pub use lux_core::{Color, Light, Material, Primitive, Scene, Shape};
pub use lux_math::{Ray, Vec3, EPSILON};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
