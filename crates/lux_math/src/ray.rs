use crate::Vec3;

/// A ray in 3D space with an origin and a unit direction.
///
/// The direction is normalized once at construction, so `t` along the ray is a
/// true distance and every consumer can rely on `|direction| == 1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction (normalized here).
    ///
    /// A zero-length direction yields a zero direction vector; such a ray
    /// intersects nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray starting at `origin` and passing through `target`.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_is_unit() {
        let dirs = [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(1e-3, -2e-3, 5e-4),
            Vec3::new(-120.0, 0.5, 77.0),
            Vec3::Z,
        ];
        for dir in dirs {
            let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), dir);
            assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ray_through() {
        let ray = Ray::through(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(ray.direction, Vec3::Z);
        assert_eq!(ray.at(2.0), Vec3::ZERO);
    }

    #[test]
    fn test_ray_zero_direction() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::ZERO);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }
}
