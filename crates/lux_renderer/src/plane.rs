//! Ray-plane intersection.

use crate::hittable::Hittable;
use lux_core::InfinitePlane;
use lux_math::{Ray, Vec3, EPSILON, PARALLEL_EPSILON};

impl Hittable for InfinitePlane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.offset - ray.origin.dot(self.normal)) / denom;
        if t <= EPSILON {
            return None;
        }
        Some(t)
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }
}
