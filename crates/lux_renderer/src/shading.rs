//! Recursive shading: Phong direct lighting with stratified soft shadows,
//! pass-through transparency and mirror reflection.

use crate::gen_f32;
use crate::hittable::Hittable;
use crate::query::{attenuated_visibility, closest_hit};
use lux_core::{Color, Light, Material, Scene, SceneError};
use lux_math::{perpendicular_basis, reflect, Ray, Vec3, EPSILON};
use rand::RngCore;

/// Hard limit on recursion depth regardless of the scene's setting.
pub const MAX_DEPTH_CEILING: u32 = 16;

/// Shades rays against one validated scene.
///
/// Construction validates the scene, so material lookups during shading
/// cannot go out of range.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    max_depth: u32,
}

impl<'a> Tracer<'a> {
    /// Validate the scene and clamp its recursion depth to `MAX_DEPTH_CEILING`.
    pub fn new(scene: &'a Scene) -> Result<Self, SceneError> {
        Self::with_depth_ceiling(scene, MAX_DEPTH_CEILING)
    }

    /// Validate the scene and clamp its recursion depth to `ceiling`.
    pub fn with_depth_ceiling(scene: &'a Scene, ceiling: u32) -> Result<Self, SceneError> {
        scene.validate()?;

        let requested = scene.settings.max_recursion;
        let max_depth = requested.min(ceiling);
        if max_depth < requested {
            log::warn!(
                "Max recursion {} exceeds ceiling {}, clamping",
                requested,
                ceiling
            );
        }

        Ok(Self { scene, max_depth })
    }

    /// Depth budget for primary rays.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Color seen along `ray` with `depth` levels of recursion left.
    ///
    /// Unclamped: reflection is added on top of the transparency blend, so
    /// channels may exceed 1.0 until the per-pixel clamp.
    pub fn shade(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let background = self.scene.settings.background;
        if depth == 0 {
            return background;
        }

        let Some(hit) = closest_hit(ray, &self.scene.primitives) else {
            return background;
        };

        // In range: checked by Scene::validate in the constructor
        let material = &self.scene.materials[hit.primitive.material];

        // Light the side the ray arrived from
        let mut normal = hit.primitive.normal_at(hit.p);
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        let local = self.direct_lighting(hit.p, normal, material, ray, rng);

        let mut color = if material.is_transparent() {
            let behind_ray = Ray::new(hit.p + EPSILON * ray.direction, ray.direction);
            let behind = self.shade(&behind_ray, depth - 1, rng);
            material.transparency * behind + (1.0 - material.transparency) * local
        } else {
            local
        };

        if material.is_reflective() {
            let mirror = reflect(ray.direction, normal).normalize_or_zero();
            let reflected_ray = Ray::new(hit.p + EPSILON * normal, mirror);
            let reflected = self.shade(&reflected_ray, depth - 1, rng);
            color += material.reflection * reflected;
        }

        color
    }

    /// Sum of diffuse and specular contributions of every light, each scaled
    /// by its soft-shadow intensity.
    fn direct_lighting(
        &self,
        point: Vec3,
        normal: Vec3,
        material: &Material,
        ray: &Ray,
        rng: &mut dyn RngCore,
    ) -> Color {
        let view = -ray.direction;
        let mut total = Color::ZERO;

        for light in &self.scene.lights {
            let intensity = self.light_intensity(light, point, rng);
            if intensity <= 0.0 {
                continue;
            }

            let to_light = (light.position - point).normalize_or_zero();
            let diffuse = light.color * material.diffuse * normal.dot(to_light).max(0.0);

            let reflected = reflect(-to_light, normal);
            let highlight = reflected.dot(view).max(0.0).powf(material.shininess);
            let specular = light.specular_intensity * light.color * material.specular * highlight;

            total += intensity * (diffuse + specular);
        }

        total
    }

    /// `(1 - shadow_intensity) + shadow_intensity * hit_ratio`.
    fn light_intensity(&self, light: &Light, point: Vec3, rng: &mut dyn RngCore) -> f32 {
        let shadow = light.shadow_intensity;
        if shadow <= 0.0 {
            return 1.0;
        }
        (1.0 - shadow) + shadow * self.light_hit_ratio(light, point, rng)
    }

    /// Mean transmitted fraction over an N x N stratified grid on the light.
    pub fn light_hit_ratio(&self, light: &Light, point: Vec3, rng: &mut dyn RngCore) -> f32 {
        let n = self.scene.settings.shadow_rays.max(1);
        let samples = stratified_light_samples(light, point, n, rng);

        let mut sum = 0.0;
        for sample in &samples {
            let direction = (*sample - point).normalize_or_zero();
            let origin = point + EPSILON * direction;
            let shadow_ray = Ray::new(origin, direction);
            let max_distance = (*sample - origin).length();
            sum += attenuated_visibility(
                &shadow_ray,
                &self.scene.primitives,
                &self.scene.materials,
                max_distance,
            );
        }

        sum / samples.len() as f32
    }
}

/// One jittered point per cell of an N x N grid over the light's square.
///
/// The square has side `light.radius`, is centered on the light and lies
/// perpendicular to the light-to-surface direction.
pub(crate) fn stratified_light_samples(
    light: &Light,
    point: Vec3,
    n: u32,
    rng: &mut dyn RngCore,
) -> Vec<Vec3> {
    let light_dir = (point - light.position).normalize_or_zero();
    if light_dir == Vec3::ZERO {
        return vec![light.position];
    }

    let (u, v) = perpendicular_basis(light_dir);
    let cell = light.radius / n as f32;
    let half = light.radius * 0.5;

    let mut samples = Vec::with_capacity(n as usize * n as usize);
    for i in 0..n {
        for j in 0..n {
            let du = -half + (i as f32 + gen_f32(rng)) * cell;
            let dv = -half + (j as f32 + gen_f32(rng)) * cell;
            samples.push(light.position + du * u + dv * v);
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{CameraSettings, Primitive, Settings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene_with(settings: Settings) -> Scene {
        let camera = CameraSettings {
            position: Vec3::ZERO,
            look_at: Vec3::Z,
            up: Vec3::Y,
            screen_distance: 1.0,
            screen_width: 1.0,
        };
        Scene::new("shading", camera, settings)
    }

    fn white_light(position: Vec3, shadow_intensity: f32, radius: f32) -> Light {
        Light {
            position,
            color: Color::ONE,
            specular_intensity: 1.0,
            shadow_intensity,
            radius,
        }
    }

    fn opaque() -> Material {
        Material::diffuse(Color::ONE)
    }

    #[test]
    fn test_depth_zero_returns_background() {
        let background = Color::new(0.2, 0.4, 0.6);
        let mut scene = scene_with(Settings {
            background,
            shadow_rays: 1,
            max_recursion: 3,
        });
        let m = scene.add_material(opaque());
        scene.add_primitive(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, m));

        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(tracer.shade(&ray, 0, &mut rng), background);
    }

    #[test]
    fn test_miss_returns_background() {
        let background = Color::new(0.1, 0.1, 0.3);
        let scene = scene_with(Settings {
            background,
            ..Default::default()
        });
        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(tracer.shade(&Ray::new(Vec3::ZERO, Vec3::X), 3, &mut rng), background);
    }

    #[test]
    fn test_depth_is_clamped() {
        let scene = scene_with(Settings {
            max_recursion: 1000,
            ..Default::default()
        });
        assert_eq!(Tracer::new(&scene).unwrap().max_depth(), MAX_DEPTH_CEILING);
        assert_eq!(Tracer::with_depth_ceiling(&scene, 4).unwrap().max_depth(), 4);
    }

    #[test]
    fn test_invalid_scene_rejected() {
        let mut scene = scene_with(Settings::default());
        scene.add_primitive(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, 0));
        assert!(matches!(
            Tracer::new(&scene),
            Err(SceneError::MaterialIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_oversized_shadow_grid_rejected() {
        let scene = scene_with(Settings {
            shadow_rays: 65536,
            ..Settings::default()
        });
        assert!(matches!(
            Tracer::new(&scene),
            Err(SceneError::TooManyShadowRays { requested: 65536, .. })
        ));
    }

    #[test]
    fn test_stratified_samples_one_per_cell() {
        let light = white_light(Vec3::new(0.0, 10.0, 0.0), 1.0, 2.0);
        let point = Vec3::ZERO;
        let n = 4;
        let mut rng = StdRng::seed_from_u64(7);
        let samples = stratified_light_samples(&light, point, n, &mut rng);
        assert_eq!(samples.len(), 16);

        let (u, v) = perpendicular_basis((point - light.position).normalize());
        let cell = 2.0 / n as f32;
        let mut occupied = vec![0; 16];
        for s in &samples {
            let d = *s - light.position;
            // Samples lie in the light's plane
            assert!(d.dot((point - light.position).normalize()).abs() < 1e-5);
            let i = ((d.dot(u) + 1.0) / cell).floor() as usize;
            let j = ((d.dot(v) + 1.0) / cell).floor() as usize;
            occupied[i.min(3) * 4 + j.min(3)] += 1;
        }
        assert!(occupied.iter().all(|&c| c == 1), "{:?}", occupied);
    }

    #[test]
    fn test_hit_ratio_unoccluded_and_blocked() {
        let mut scene = scene_with(Settings {
            shadow_rays: 3,
            ..Default::default()
        });
        let m = scene.add_material(opaque());
        let light = white_light(Vec3::new(0.0, 10.0, 0.0), 1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(3);

        {
            let tracer = Tracer::new(&scene).unwrap();
            assert_eq!(tracer.light_hit_ratio(&light, Vec3::ZERO, &mut rng), 1.0);
        }

        // Big opaque slab between the point and the light
        scene.add_primitive(Primitive::cube(Vec3::new(0.0, 5.0, 0.0), 4.0, m));
        let tracer = Tracer::new(&scene).unwrap();
        assert_eq!(tracer.light_hit_ratio(&light, Vec3::ZERO, &mut rng), 0.0);
    }

    #[test]
    fn test_hit_ratio_matches_visible_fraction() {
        // Opaque cube hiding exactly the -x half of the light square
        for n in [2, 4, 8] {
            let mut scene = scene_with(Settings {
                shadow_rays: n,
                ..Default::default()
            });
            let m = scene.add_material(opaque());
            scene.add_primitive(Primitive::cube(Vec3::new(-0.5, 5.0, 0.0), 1.0, m));
            let tracer = Tracer::new(&scene).unwrap();

            let light = white_light(Vec3::new(0.0, 10.0, 0.0), 1.0, 2.0);
            let mut rng = StdRng::seed_from_u64(11);
            let ratio = tracer.light_hit_ratio(&light, Vec3::ZERO, &mut rng);
            assert!((ratio - 0.5).abs() < 1e-6, "n={} ratio={}", n, ratio);
        }
    }

    #[test]
    fn test_shadow_intensity_zero_ignores_occluders() {
        let mut scene = scene_with(Settings {
            shadow_rays: 2,
            ..Default::default()
        });
        let m = scene.add_material(opaque());
        scene.add_primitive(Primitive::cube(Vec3::new(0.0, 5.0, 0.0), 4.0, m));
        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let unshadowed = white_light(Vec3::new(0.0, 10.0, 0.0), 0.0, 1.0);
        assert_eq!(tracer.light_intensity(&unshadowed, Vec3::ZERO, &mut rng), 1.0);

        let partial = white_light(Vec3::new(0.0, 10.0, 0.0), 0.25, 1.0);
        let intensity = tracer.light_intensity(&partial, Vec3::ZERO, &mut rng);
        assert!((intensity - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_transparent_occluder_casts_partial_shadow() {
        let mut scene = scene_with(Settings {
            shadow_rays: 2,
            ..Default::default()
        });
        let glass = scene.add_material(Material {
            transparency: 0.4,
            ..opaque()
        });
        scene.add_primitive(Primitive::cube(Vec3::new(0.0, 5.0, 0.0), 4.0, glass));
        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let light = white_light(Vec3::new(0.0, 10.0, 0.0), 1.0, 1.0);
        let ratio = tracer.light_hit_ratio(&light, Vec3::ZERO, &mut rng);
        assert!((ratio - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_transparency_blends_with_background() {
        let background = Color::new(0.0, 0.0, 1.0);
        let mut scene = scene_with(Settings {
            background,
            shadow_rays: 1,
            max_recursion: 4,
        });
        // Fully lit white sphere, half transparent, no lights -> local is black
        let m = scene.add_material(Material {
            transparency: 0.5,
            ..opaque()
        });
        scene.add_primitive(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, m));
        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        // Front face blends with what's behind; the back face does the same,
        // then the continuation reaches the background: 0.5 * 0.5 * bg
        let color = tracer.shade(&Ray::new(Vec3::ZERO, Vec3::Z), 4, &mut rng);
        assert!((color - background * 0.25).length() < 1e-5, "{:?}", color);

        // With only two levels the inner continuation stops at depth 0,
        // which also yields the background
        let color = tracer.shade(&Ray::new(Vec3::ZERO, Vec3::Z), 2, &mut rng);
        assert!((color - background * 0.25).length() < 1e-5, "{:?}", color);

        // One level: the continuation returns background immediately
        let color = tracer.shade(&Ray::new(Vec3::ZERO, Vec3::Z), 1, &mut rng);
        assert!((color - background * 0.5).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_mirror_returns_reflected_color() {
        let mut scene = scene_with(Settings {
            background: Color::ZERO,
            shadow_rays: 1,
            max_recursion: 3,
        });
        let mirror = scene.add_material(Material {
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            reflection: Color::ONE,
            shininess: 1.0,
            transparency: 0.0,
        });
        let red = scene.add_material(Material {
            diffuse: Color::new(1.0, 0.0, 0.0),
            ..Material::default()
        });
        // Mirror plane facing the camera at z = 5, red sphere behind the camera
        scene.add_primitive(Primitive::plane(-Vec3::Z, -5.0, mirror));
        scene.add_primitive(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, red));
        scene.add_light(white_light(Vec3::new(0.0, 0.0, 2.0), 0.0, 0.0));

        let tracer = Tracer::new(&scene).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        // The mirror adds nothing locally
        let hit = closest_hit(&ray, &scene.primitives).unwrap();
        let local = tracer.direct_lighting(hit.p, -Vec3::Z, &scene.materials[mirror], &ray, &mut rng);
        assert_eq!(local, Color::ZERO);

        // The reflected ray travels back along -Z and sees the red sphere
        let reflected_ray = Ray::new(hit.p + EPSILON * -Vec3::Z, -Vec3::Z);
        let reflected = tracer.shade(&reflected_ray, 2, &mut rng);
        let color = tracer.shade(&ray, 3, &mut rng);
        assert!((color - reflected).length() < 1e-5);
        assert!(color.x > 0.0);
        assert_eq!(color.y, 0.0);
    }
}
