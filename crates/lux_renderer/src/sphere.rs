//! Ray-sphere intersection (geometric method).

use crate::hittable::Hittable;
use lux_core::Sphere;
use lux_math::{Ray, Vec3, EPSILON};

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let l = self.center - ray.origin;
        let t_ca = l.dot(ray.direction);
        let r2 = self.radius * self.radius;
        let l2 = l.length_squared();

        // Center behind the ray is only a miss when we start outside
        if t_ca < 0.0 && l2 > r2 {
            return None;
        }

        let d2 = l2 - t_ca * t_ca;
        if d2 > r2 {
            return None;
        }

        let t_hc = (r2 - d2).sqrt();
        [t_ca - t_hc, t_ca + t_hc].into_iter().find(|&t| t > EPSILON)
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize_or_zero()
    }
}
