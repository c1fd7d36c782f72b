use crate::{Interval, Ray, Vec3, PARALLEL_EPSILON};

/// Axis-aligned bounding box made of one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Create the cube of the given edge length centered on `center`.
    pub fn from_center(center: Vec3, edge: f32) -> Self {
        let half = Vec3::splat(edge * 0.5);
        Self::from_points(center - half, center + half)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Parametric entry/exit interval of the ray's line through the box.
    ///
    /// Slab method. An axis whose direction component is below
    /// `PARALLEL_EPSILON` bounds nothing when the origin lies inside that slab
    /// and rejects the ray when it lies outside. Returns `None` when the slabs
    /// do not overlap; the result may lie partly or wholly behind the origin.
    pub fn slab_interval(&self, r: &Ray) -> Option<Interval> {
        let mut span = Interval::UNIVERSE;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let orig = r.origin[axis];
            let dir = r.direction[axis];

            if dir.abs() < PARALLEL_EPSILON {
                if !slab.contains(orig) {
                    return None;
                }
                continue;
            }

            let mut t0 = (slab.min - orig) / dir;
            let mut t1 = (slab.max - orig) / dir;
            if dir < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            span = span.intersect(&Interval::new(t0, t1));
        }

        if span.is_empty() {
            None
        } else {
            Some(span)
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }
}
