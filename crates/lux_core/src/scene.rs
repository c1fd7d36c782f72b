//! Scene model for Lux.
//!
//! A `Scene` is built once from a scene description and is read-only for the
//! whole render. Material references on primitives are stored 0-based here;
//! the 1-based form used by scene files only exists at the loading boundary.

use lux_math::{Interval, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Largest accepted shadow grid resolution N (N x N rays per light).
pub const MAX_SHADOW_RAYS: u32 = 256;

/// Errors found while validating a scene before rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("primitive {primitive} references material {index}, but only {count} materials are defined")]
    MaterialIndexOutOfRange {
        primitive: usize,
        /// 1-based, as written in the scene file
        index: usize,
        count: usize,
    },

    #[error("primitive {primitive}: {message}")]
    InvalidPrimitive { primitive: usize, message: String },

    #[error("material {material}: {message}")]
    InvalidMaterial { material: usize, message: String },

    #[error("light {light}: {message}")]
    InvalidLight { light: usize, message: String },

    #[error("shadow ray grid resolution must be at least 1")]
    NoShadowRays,

    #[error("shadow ray grid resolution {requested} exceeds the maximum of {max}")]
    TooManyShadowRays { requested: u32, max: u32 },

    #[error("degenerate camera: {0}")]
    DegenerateCamera(&'static str),
}

/// Surface material with Phong-style coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color (RGB, 0-1)
    pub diffuse: Color,

    /// Specular color (RGB, 0-1)
    pub specular: Color,

    /// Reflection color (RGB, 0-1); zero means no mirror reflection
    pub reflection: Color,

    /// Phong specular exponent (> 0)
    pub shininess: f32,

    /// Pass-through fraction (0=opaque, 1=fully transparent)
    pub transparency: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.5),
            specular: Color::ZERO,
            reflection: Color::ZERO,
            shininess: 1.0,
            transparency: 0.0,
        }
    }
}

impl Material {
    /// Create an opaque, non-reflective material with only a diffuse color.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// Check if this material reflects any light.
    pub fn is_reflective(&self) -> bool {
        self.reflection.max_element() > 0.0
    }

    /// Check if this material lets light pass through.
    pub fn is_transparent(&self) -> bool {
        self.transparency > 0.0
    }
}

/// Sphere geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Axis-aligned cube geometry with uniform edge length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub center: Vec3,
    pub edge: f32,
}

/// Infinite plane `normal . p = offset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaneEquation")]
pub struct InfinitePlane {
    /// Unit normal
    pub normal: Vec3,
    pub offset: f32,
}

impl InfinitePlane {
    /// Plane `normal . p = offset` with the equation rescaled so the normal
    /// has unit length. A zero normal is kept as is for validation to reject.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        let length = normal.length();
        if length == 0.0 {
            return Self { normal, offset };
        }
        Self {
            normal: normal / length,
            offset: offset / length,
        }
    }
}

/// Plane equation as written in a scene file, normal of any length.
#[derive(Deserialize)]
struct PlaneEquation {
    normal: Vec3,
    offset: f32,
}

impl From<PlaneEquation> for InfinitePlane {
    fn from(eq: PlaneEquation) -> Self {
        Self::new(eq.normal, eq.offset)
    }
}

/// The closed set of supported shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere(Sphere),
    Cube(Cube),
    Plane(InfinitePlane),
}

/// A shape plus the material it is rendered with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    #[serde(flatten)]
    pub shape: Shape,

    /// 0-based index into `Scene::materials`
    #[serde(rename = "material_index", with = "one_based")]
    pub material: usize,
}

impl Primitive {
    /// Create a sphere primitive.
    pub fn sphere(center: Vec3, radius: f32, material: usize) -> Self {
        Self {
            shape: Shape::Sphere(Sphere { center, radius }),
            material,
        }
    }

    /// Create an axis-aligned cube primitive.
    pub fn cube(center: Vec3, edge: f32, material: usize) -> Self {
        Self {
            shape: Shape::Cube(Cube { center, edge }),
            material,
        }
    }

    /// Create an infinite plane primitive from `normal . p = offset`.
    pub fn plane(normal: Vec3, offset: f32, material: usize) -> Self {
        Self {
            shape: Shape::Plane(InfinitePlane::new(normal, offset)),
            material,
        }
    }
}

/// Square area light, sampled on a grid for soft shadows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub specular_intensity: f32,

    /// 0 = ignores occluders, 1 = fully shadowable
    pub shadow_intensity: f32,

    /// Side length of the square light footprint
    pub radius: f32,
}

/// Viewpoint and screen placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Nominal up; need not be orthogonal to the viewing direction
    pub up: Vec3,
    pub screen_distance: f32,
    pub screen_width: f32,
}

/// Global render settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub background: Color,

    /// Shadow grid resolution N (N x N samples per light)
    pub shadow_rays: u32,

    pub max_recursion: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
            shadow_rays: 1,
            max_recursion: 3,
        }
    }
}

/// A complete scene: camera, settings, materials, primitives and lights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (usually from filename)
    #[serde(default)]
    pub name: String,
    pub camera: CameraSettings,
    pub settings: Settings,
    pub materials: Vec<Material>,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene with the given camera and settings.
    pub fn new(name: impl Into<String>, camera: CameraSettings, settings: Settings) -> Self {
        Self {
            name: name.into(),
            camera,
            settings,
            materials: Vec::new(),
            primitives: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Add a material and return its 0-based index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a primitive.
    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Check every invariant the renderer relies on.
    ///
    /// Entity numbers in errors are 1-based, matching the order of appearance
    /// in the scene file.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.validate_camera()?;

        if self.settings.shadow_rays == 0 {
            return Err(SceneError::NoShadowRays);
        }
        if self.settings.shadow_rays > MAX_SHADOW_RAYS {
            return Err(SceneError::TooManyShadowRays {
                requested: self.settings.shadow_rays,
                max: MAX_SHADOW_RAYS,
            });
        }

        for (i, material) in self.materials.iter().enumerate() {
            let invalid = |message: &str| SceneError::InvalidMaterial {
                material: i + 1,
                message: message.to_string(),
            };
            for (name, color) in [
                ("diffuse", material.diffuse),
                ("specular", material.specular),
                ("reflection", material.reflection),
            ] {
                if !color.to_array().iter().all(|&c| Interval::UNIT.contains(c)) {
                    return Err(invalid(&format!("{} color must lie in [0, 1]", name)));
                }
            }
            if !Interval::UNIT.contains(material.transparency) {
                return Err(invalid("transparency must lie in [0, 1]"));
            }
            if material.shininess <= 0.0 {
                return Err(invalid("shininess must be positive"));
            }
        }

        for (i, primitive) in self.primitives.iter().enumerate() {
            if primitive.material >= self.materials.len() {
                return Err(SceneError::MaterialIndexOutOfRange {
                    primitive: i + 1,
                    index: primitive.material + 1,
                    count: self.materials.len(),
                });
            }

            let message = match &primitive.shape {
                Shape::Sphere(s) if s.radius <= 0.0 => Some("sphere radius must be positive"),
                Shape::Cube(c) if c.edge <= 0.0 => Some("cube edge length must be positive"),
                Shape::Plane(p) if p.normal.length_squared() == 0.0 => {
                    Some("plane normal must be non-zero")
                }
                _ => None,
            };
            if let Some(message) = message {
                return Err(SceneError::InvalidPrimitive {
                    primitive: i + 1,
                    message: message.to_string(),
                });
            }
        }

        for (i, light) in self.lights.iter().enumerate() {
            if !Interval::UNIT.contains(light.shadow_intensity) {
                return Err(SceneError::InvalidLight {
                    light: i + 1,
                    message: "shadow intensity must lie in [0, 1]".to_string(),
                });
            }
            if light.radius < 0.0 {
                return Err(SceneError::InvalidLight {
                    light: i + 1,
                    message: "radius must not be negative".to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_camera(&self) -> Result<(), SceneError> {
        let cam = &self.camera;
        let forward = cam.look_at - cam.position;
        if forward.length_squared() == 0.0 {
            return Err(SceneError::DegenerateCamera("look-at point equals camera position"));
        }
        if forward.normalize().cross(cam.up.normalize_or_zero()).length() < 1e-6 {
            return Err(SceneError::DegenerateCamera("up vector is parallel to the view direction"));
        }
        if cam.screen_width <= 0.0 || cam.screen_distance <= 0.0 {
            return Err(SceneError::DegenerateCamera("screen width and distance must be positive"));
        }
        Ok(())
    }
}

/// Serialize 0-based material indices in the 1-based form scene files use.
mod one_based {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(index: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*index as u64 + 1)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let index = u64::deserialize(deserializer)?;
        if index == 0 {
            return Err(de::Error::custom("material indices start at 1"));
        }
        Ok(index as usize - 1)
    }
}
