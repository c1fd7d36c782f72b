//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket owns its random generator, seeded
//! from the render seed and the bucket's position, so the image does not
//! depend on thread scheduling.

use crate::renderer::render_pixel;
use crate::{Camera, Color, Tracer};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator.
    pub fn seed(&self, render_seed: u64) -> u64 {
        render_seed ^ ((self.y as u64) << 32 | self.x as u64)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets covering the image, sorted center-out.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket to a vector of clamped colors.
///
/// Returns pixels in row-major order within the bucket. Pixel centers are
/// advanced by the camera's column/row steps instead of being recomputed.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, tracer: &Tracer, seed: u64) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    let mut row_head = camera.pixel_center(bucket.x, bucket.y);
    for _ in 0..bucket.height {
        let mut pixel = row_head;
        for _ in 0..bucket.width {
            pixels.push(render_pixel(tracer, camera, pixel, &mut rng));
            pixel += camera.column_step();
        }
        row_head += camera.row_step();
    }

    log::debug!(
        "Bucket {} ({}, {}) {}x{} done",
        bucket.index,
        bucket.x,
        bucket.y,
        bucket.width,
        bucket.height
    );

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
