//! Render configuration, the parallel render loop and the output image.

use std::path::Path;
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::shading::{Tracer, MAX_DEPTH_CEILING};
use crate::Camera;
use lux_core::{Color, Scene, SceneError};
use lux_math::{Interval, Vec3};
use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

/// Errors that abort a render before or after the pixel pass.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Base seed for shadow-sample jitter
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Upper bound on the scene's recursion depth
    pub max_depth_ceiling: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            max_depth_ceiling: MAX_DEPTH_CEILING,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the bucket size.
    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// Set the recursion depth ceiling.
    pub fn with_depth_ceiling(mut self, ceiling: u32) -> Self {
        self.max_depth_ceiling = ceiling;
        self
    }
}

/// Clamp each channel to [0, 1].
#[inline]
pub fn clamp_color(color: Color) -> Color {
    Color::new(
        Interval::UNIT.clamp(color.x),
        Interval::UNIT.clamp(color.y),
        Interval::UNIT.clamp(color.z),
    )
}

/// Convert a color to 8-bit RGB (clamped, linear).
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = clamp_color(color);
    [
        (255.0 * c.x) as u8,
        (255.0 * c.y) as u8,
        (255.0 * c.z) as u8,
    ]
}

/// Shade the primary ray through one screen point, clamped to [0, 1].
pub fn render_pixel(tracer: &Tracer, camera: &Camera, screen_point: Vec3, rng: &mut dyn RngCore) -> Color {
    let ray = camera.ray_through(screen_point);
    clamp_color(tracer.shade(&ray, tracer.max_depth(), rng))
}

/// Row-major image of per-pixel colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % b.width;
            let local_y = i as u32 / b.width;
            self.set(b.x + local_x, b.y + local_y, *color);
        }
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Save the image; the format follows the file extension (PNG, JPEG, BMP...).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        log::info!("Saved {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }
}

/// Render the scene.
///
/// Validates the scene and dimensions before any pixel work, then renders
/// buckets in parallel. The result is deterministic for a given seed.
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    if config.width == 0 || config.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }

    let tracer = Tracer::with_depth_ceiling(scene, config.max_depth_ceiling)?;
    let camera = Camera::new(&scene.camera, config.width, config.height);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering '{}' at {}x{}: {} buckets, depth {}, {}x{} shadow rays",
        scene.name,
        config.width,
        config.height,
        buckets.len(),
        tracer.max_depth(),
        scene.settings.shadow_rays,
        scene.settings.shadow_rays
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, &camera, &tracer, config.seed))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
