//! Ray-cube intersection for axis-aligned cubes (slab method).

use crate::hittable::Hittable;
use lux_core::Cube;
use lux_math::{Aabb, Ray, Vec3, EPSILON};

impl Hittable for Cube {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let span = Aabb::from_center(self.center, self.edge).slab_interval(ray)?;

        // Box entirely behind (or at) the origin
        if span.max <= EPSILON {
            return None;
        }

        // Inside the box the entry lies behind us; use the exit
        if span.min > EPSILON {
            Some(span.min)
        } else {
            Some(span.max)
        }
    }

    /// Face normal along the dominant axis of `p - center`.
    fn normal_at(&self, p: Vec3) -> Vec3 {
        let d = p - self.center;
        let a = d.abs();

        if a.x >= a.y && a.x >= a.z {
            Vec3::new(d.x.signum(), 0.0, 0.0)
        } else if a.y >= a.z {
            Vec3::new(0.0, d.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, d.z.signum())
        }
    }
}
