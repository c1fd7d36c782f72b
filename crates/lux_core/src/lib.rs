//! Lux Core - scene model and scene-description loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Material`, `Primitive`, `Light`, `Settings`
//! - **Validation**: `Scene::validate` rejects scenes that cannot be rendered
//! - **Loading**: the line-oriented `.txt` scene format and a JSON form
//!
//! # Example
//!
//! ```ignore
//! use lux_core::load_scene;
//!
//! let scene = load_scene("scenes/pool.txt")?;
//! println!("Loaded {} primitives, {} lights",
//!     scene.primitives.len(),
//!     scene.lights.len());
//! ```

pub mod loader;
pub mod parser;
pub mod scene;

pub use loader::{load_scene, load_scene_from_json, LoadError, LoadResult};
pub use parser::{parse_scene, ParseError, ParseResult};
pub use scene::{
    CameraSettings, Color, Cube, InfinitePlane, Light, Material, Primitive, Scene, SceneError,
    Settings, Shape, Sphere, MAX_SHADOW_RAYS,
};
