//! Hittable trait and HitRecord for ray-primitive intersection.

use lux_core::{Primitive, Shape};
use lux_math::{Ray, Vec3};

/// Record of the nearest ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs (a distance, rays are unit)
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// The primitive that was hit
    pub primitive: &'a Primitive,
}

/// Geometry that can be intersected by rays.
pub trait Hittable {
    /// Nearest forward hit parameter `t > EPSILON`, or `None` for a miss.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, p: Vec3) -> Vec3;
}

impl Hittable for Shape {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        // Degenerate rays hit nothing
        if ray.direction == Vec3::ZERO {
            return None;
        }

        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Cube(c) => c.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
        }
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(p),
            Shape::Cube(c) => c.normal_at(p),
            Shape::Plane(pl) => pl.normal_at(p),
        }
    }
}

impl Hittable for Primitive {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.shape.intersect(ray)
    }

    #[inline]
    fn normal_at(&self, p: Vec3) -> Vec3 {
        self.shape.normal_at(p)
    }
}
