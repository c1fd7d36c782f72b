//! Pinhole camera and image-plane pixel grid.

use lux_core::CameraSettings;
use lux_math::{Ray, Vec3};

/// Camera basis and pixel grid, built once per render.
///
/// Pixel (0, 0) is the top-left of the image. Moving one column adds
/// `pixel_size * right`; moving one row down adds `-pixel_size * up`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    pixel_size: f32,
    first_pixel: Vec3,
}

impl Camera {
    /// Build the orthonormal basis and pixel grid for the given resolution.
    ///
    /// `right = forward x up` and the corrected up is `right x forward`, so the
    /// nominal up only needs to be non-parallel to the view direction.
    pub fn new(settings: &CameraSettings, image_width: u32, image_height: u32) -> Self {
        let position = settings.position;
        let forward = (settings.look_at - position).normalize_or_zero();
        let right = forward.cross(settings.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        // Screen dimensions in world units
        let pixel_size = settings.screen_width / image_width.max(1) as f32;
        let screen_height = pixel_size * image_height as f32;
        let screen_center = position + forward * settings.screen_distance;

        let top_left = screen_center + up * (screen_height / 2.0) - right * (settings.screen_width / 2.0);
        let first_pixel = top_left + (right - up) * (pixel_size / 2.0);

        Self {
            image_width,
            image_height,
            position,
            forward,
            right,
            up,
            pixel_size,
            first_pixel,
        }
    }

    /// Camera position (origin of every primary ray).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    /// Center of the top-left pixel on the screen.
    #[inline]
    pub fn first_pixel_center(&self) -> Vec3 {
        self.first_pixel
    }

    /// Offset from one pixel center to the next one in the same row.
    #[inline]
    pub fn column_step(&self) -> Vec3 {
        self.right * self.pixel_size
    }

    /// Offset from one pixel center to the one directly below it.
    #[inline]
    pub fn row_step(&self) -> Vec3 {
        -self.up * self.pixel_size
    }

    /// World-space center of pixel (x, y).
    pub fn pixel_center(&self, x: u32, y: u32) -> Vec3 {
        self.first_pixel + x as f32 * self.column_step() + y as f32 * self.row_step()
    }

    /// Primary ray from the camera through a point on the screen.
    #[inline]
    pub fn ray_through(&self, screen_point: Vec3) -> Ray {
        Ray::through(self.position, screen_point)
    }

    /// Primary ray through the center of pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        self.ray_through(self.pixel_center(x, y))
    }
}
