// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Minimum ray parameter accepted as a forward hit, and the offset applied to
/// secondary ray origins so they do not re-hit the surface they leave.
pub const EPSILON: f32 = 1e-4;

/// Below this magnitude a direction component (or a direction/normal dot
/// product) is treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Two unit vectors spanning the plane perpendicular to the unit vector `dir`.
///
/// World X is used as the helper axis unless `dir` is close to it, then world Y.
pub fn perpendicular_basis(dir: Vec3) -> (Vec3, Vec3) {
    let helper = if dir.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let u = helper.cross(dir).normalize();
    let v = dir.cross(u).normalize();
    (u, v)
}
