//! High-level scene loading.
//!
//! Reads a scene file, picks the format from the extension and validates the
//! result so a loaded `Scene` is always renderable:
//! - `.json` - serde form of `Scene` (1-based `material_index`)
//! - anything else - the line-oriented text format

use std::path::Path;

use thiserror::Error;

use crate::parser::{parse_scene, ParseError};
use crate::scene::{Scene, SceneError};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load and validate a scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let scene = if is_json {
        load_scene_from_json(&content, name)?
    } else {
        let scene = parse_scene(&content, name)?;
        scene.validate()?;
        scene
    };

    log::info!(
        "Loaded scene '{}' from {:?}: {} primitives, {} materials, {} lights",
        scene.name,
        path,
        scene.primitives.len(),
        scene.materials.len(),
        scene.lights.len()
    );

    Ok(scene)
}

/// Load and validate a scene from its JSON form.
pub fn load_scene_from_json(content: &str, name: &str) -> LoadResult<Scene> {
    let mut scene: Scene = serde_json::from_str(content)?;
    if scene.name.is_empty() {
        scene.name = name.to_string();
    }
    scene.validate()?;
    Ok(scene)
}
