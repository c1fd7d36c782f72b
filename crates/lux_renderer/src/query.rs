//! Ray queries against the scene's primitive list.
//!
//! All three are linear scans; scenes are small and unsorted.

use crate::hittable::{HitRecord, Hittable};
use lux_core::{Material, Primitive};
use lux_math::{Interval, Ray, EPSILON};

/// Nearest forward intersection over all primitives.
///
/// On exact ties the first primitive in list order wins.
pub fn closest_hit<'a>(ray: &Ray, primitives: &'a [Primitive]) -> Option<HitRecord<'a>> {
    let mut closest: Option<(f32, &Primitive)> = None;

    for primitive in primitives {
        if let Some(t) = primitive.intersect(ray) {
            if closest.map_or(true, |(best, _)| t < best) {
                closest = Some((t, primitive));
            }
        }
    }

    closest.map(|(t, primitive)| HitRecord {
        t,
        p: ray.at(t),
        primitive,
    })
}

/// True when the ray hits nothing at all, at any distance.
pub fn is_visible(ray: &Ray, primitives: &[Primitive]) -> bool {
    !primitives.iter().any(|p| p.intersect(ray).is_some())
}

/// Fraction of light transmitted along the ray up to `max_distance`.
///
/// Multiplies the transparency of every primitive hit strictly inside
/// `(EPSILON, max_distance)`. Returns exactly 1.0 with no occluders and stops
/// as soon as the product reaches 0. A primitive whose material cannot be
/// found is treated as opaque.
pub fn attenuated_visibility(
    ray: &Ray,
    primitives: &[Primitive],
    materials: &[Material],
    max_distance: f32,
) -> f32 {
    let window = Interval::new(EPSILON, max_distance);
    let mut transmitted = 1.0;

    for primitive in primitives {
        let Some(t) = primitive.intersect(ray) else {
            continue;
        };
        if !window.surrounds(t) {
            continue;
        }

        transmitted *= materials
            .get(primitive.material)
            .map_or(0.0, |m| m.transparency);
        if transmitted <= 0.0 {
            return 0.0;
        }
    }

    transmitted
}
