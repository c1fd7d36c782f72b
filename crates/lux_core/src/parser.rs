//! Scene text format parser.
//!
//! One entity per line: a keyword followed by whitespace-separated numbers.
//! Blank lines and lines starting with `#` are ignored.
//!
//! # Supported Syntax
//!
//! - `cam px py pz lx ly lz ux uy uz screen_distance screen_width`
//! - `set bg_r bg_g bg_b shadow_rays max_recursion`
//! - `mtl dr dg db sr sg sb rr rg rb shininess transparency`
//! - `sph cx cy cz radius material_index`
//! - `pln nx ny nz offset material_index`
//! - `box cx cy cz edge material_index`
//! - `lgt px py pz r g b specular_intensity shadow_intensity radius`
//!
//! Material indices are 1-based in the file and 0-based in the parsed scene.

use lux_math::Vec3;
use thiserror::Error;

use crate::scene::{CameraSettings, Light, Material, Primitive, Scene, Settings};

/// Errors that can occur while parsing a scene file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: unknown entity '{keyword}'")]
    UnknownKeyword { line: usize, keyword: String },

    #[error("line {line}: '{keyword}' expects {expected} values, found {found}")]
    ArgumentCount {
        line: usize,
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("scene has no camera ('cam') line")]
    MissingCamera,

    #[error("scene has no settings ('set') line")]
    MissingSettings,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse scene text into a `Scene`.
///
/// Only syntax is checked here; call `Scene::validate` for semantic checks
/// such as material indices being in range.
pub fn parse_scene(content: &str, name: &str) -> ParseResult<Scene> {
    let mut camera = None;
    let mut settings = None;
    let mut materials = Vec::new();
    let mut primitives = Vec::new();
    let mut lights = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match keyword {
            "cam" => {
                let v = numbers(line, keyword, &args, 11)?;
                camera = Some(CameraSettings {
                    position: vec3(&v[0..3]),
                    look_at: vec3(&v[3..6]),
                    up: vec3(&v[6..9]),
                    screen_distance: v[9],
                    screen_width: v[10],
                });
            }
            "set" => {
                let v = numbers(line, keyword, &args, 5)?;
                settings = Some(Settings {
                    background: vec3(&v[0..3]),
                    shadow_rays: count(line, "shadow ray count", v[3])?,
                    max_recursion: count(line, "max recursion", v[4])?,
                });
            }
            "mtl" => {
                let v = numbers(line, keyword, &args, 11)?;
                materials.push(Material {
                    diffuse: vec3(&v[0..3]),
                    specular: vec3(&v[3..6]),
                    reflection: vec3(&v[6..9]),
                    shininess: v[9],
                    transparency: v[10],
                });
            }
            "sph" => {
                let v = numbers(line, keyword, &args, 5)?;
                let material = material_index(line, v[4])?;
                primitives.push(Primitive::sphere(vec3(&v[0..3]), v[3], material));
            }
            "pln" => {
                let v = numbers(line, keyword, &args, 5)?;
                let material = material_index(line, v[4])?;
                primitives.push(Primitive::plane(vec3(&v[0..3]), v[3], material));
            }
            "box" => {
                let v = numbers(line, keyword, &args, 5)?;
                let material = material_index(line, v[4])?;
                primitives.push(Primitive::cube(vec3(&v[0..3]), v[3], material));
            }
            "lgt" => {
                let v = numbers(line, keyword, &args, 9)?;
                lights.push(Light {
                    position: vec3(&v[0..3]),
                    color: vec3(&v[3..6]),
                    specular_intensity: v[6],
                    shadow_intensity: v[7],
                    radius: v[8],
                });
            }
            _ => {
                return Err(ParseError::UnknownKeyword {
                    line,
                    keyword: keyword.to_string(),
                })
            }
        }
    }

    let camera = camera.ok_or(ParseError::MissingCamera)?;
    let settings = settings.ok_or(ParseError::MissingSettings)?;

    log::debug!(
        "Parsed scene '{}': {} materials, {} primitives, {} lights",
        name,
        materials.len(),
        primitives.len(),
        lights.len()
    );

    Ok(Scene {
        name: name.to_string(),
        camera,
        settings,
        materials,
        primitives,
        lights,
    })
}

/// Parse exactly `expected` floats.
fn numbers(line: usize, keyword: &str, args: &[&str], expected: usize) -> ParseResult<Vec<f32>> {
    if args.len() != expected {
        return Err(ParseError::ArgumentCount {
            line,
            keyword: keyword.to_string(),
            expected,
            found: args.len(),
        });
    }

    args.iter()
        .map(|s| {
            s.parse::<f32>().map_err(|_| ParseError::InvalidNumber {
                line,
                value: s.to_string(),
            })
        })
        .collect()
}

#[inline]
fn vec3(v: &[f32]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// A non-negative whole number written as a float.
fn count(line: usize, what: &str, value: f32) -> ParseResult<u32> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(ParseError::Parse {
            line,
            message: format!("{} must be a non-negative integer, got {}", what, value),
        });
    }
    Ok(value as u32)
}

/// Convert a 1-based material reference to a 0-based index.
fn material_index(line: usize, value: f32) -> ParseResult<usize> {
    if value < 1.0 || value.fract() != 0.0 {
        return Err(ParseError::Parse {
            line,
            message: format!("material index must be an integer >= 1, got {}", value),
        });
    }
    Ok(value as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Shape;

    const SCENE: &str = "\
# Camera: pos lookat up dist width
cam 0 0 0   0 0 1   0 1 0   1 2
set 0.1 0.2 0.3  4  5

mtl 1 0 0  1 1 1  0 0 0  30 0
mtl 0.8 0.8 0.8  0 0 0  0.5 0.5 0.5  10 0.25

sph 0 0 5 1 1
box 2 0 6 1.5 2
pln 0 2 0 -1 2
lgt 0 3 -2  1 1 1  0.5 0.9 0.4
";

    #[test]
    fn test_parse_full_scene() {
        let scene = parse_scene(SCENE, "test").unwrap();

        assert_eq!(scene.name, "test");
        assert_eq!(scene.camera.look_at, Vec3::Z);
        assert_eq!(scene.camera.screen_width, 2.0);
        assert_eq!(scene.settings.background, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(scene.settings.shadow_rays, 4);
        assert_eq!(scene.settings.max_recursion, 5);

        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.materials[1].transparency, 0.25);
        assert_eq!(scene.materials[0].shininess, 30.0);

        assert_eq!(scene.primitives.len(), 3);
        assert_eq!(scene.primitives[0].material, 0);
        assert_eq!(scene.primitives[1].material, 1);
        assert!(matches!(scene.primitives[1].shape, Shape::Cube(_)));
        match &scene.primitives[2].shape {
            Shape::Plane(p) => {
                // 2y = -1 is the plane y = -0.5
                assert_eq!(p.normal, Vec3::Y);
                assert_eq!(p.offset, -0.5);
            }
            other => panic!("expected plane, got {:?}", other),
        }

        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.lights[0].shadow_intensity, 0.9);
        assert_eq!(scene.lights[0].radius, 0.4);

        assert_eq!(scene.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_keyword() {
        let text = "cam 0 0 0 0 0 1 0 1 0 1 2\ncone 1 2 3\n";
        assert_eq!(
            parse_scene(text, "bad"),
            Err(ParseError::UnknownKeyword {
                line: 2,
                keyword: "cone".to_string()
            })
        );
    }

    #[test]
    fn test_wrong_argument_count() {
        let text = "\n\nsph 0 0 5 1\n";
        assert!(matches!(
            parse_scene(text, "bad"),
            Err(ParseError::ArgumentCount { line: 3, expected: 5, found: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_number() {
        let text = "sph 0 zero 5 1 1\n";
        assert!(matches!(
            parse_scene(text, "bad"),
            Err(ParseError::InvalidNumber { line: 1, .. })
        ));
    }

    #[test]
    fn test_material_index_zero_rejected() {
        let text = "cam 0 0 0 0 0 1 0 1 0 1 2\nset 0 0 0 1 1\nsph 0 0 5 1 0\n";
        assert!(matches!(
            parse_scene(text, "bad"),
            Err(ParseError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_camera_and_settings() {
        assert_eq!(parse_scene("set 0 0 0 1 1\n", "x"), Err(ParseError::MissingCamera));
        assert_eq!(
            parse_scene("cam 0 0 0 0 0 1 0 1 0 1 2\n", "x"),
            Err(ParseError::MissingSettings)
        );
    }

    #[test]
    fn test_out_of_range_index_parses_but_fails_validation() {
        let text = "cam 0 0 0 0 0 1 0 1 0 1 2\nset 0 0 0 1 1\nmtl 1 0 0 0 0 0 0 0 0 1 0\nsph 0 0 5 1 2\n";
        let scene = parse_scene(text, "x").unwrap();
        assert!(scene.validate().is_err());
    }
}
