//! ember core - scene data for the path tracer.
//!
//! This crate provides:
//!
//! - **Materials and primitives**: `Material`, `Sphere`, `Plane`, `Surface`
//! - **Environment**: constant, gradient and skydome radiance
//! - **Scene queries**: the `SceneQuery` trait and the `World` implementation
//! - **Files**: JSON scene descriptions and render settings
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{SceneDescription, SceneQuery};
//!
//! let world = SceneDescription::load("scene.json".as_ref())?.into_world(None)?;
//! println!("Loaded {} objects", world.len());
//! ```

pub mod description;
pub mod environment;
pub mod material;
pub mod primitive;
pub mod scene;

// Re-export commonly used types
pub use description::{EnvironmentDesc, RenderSettings, SceneDescription};
pub use environment::{Environment, Skydome};
pub use material::Material;
pub use primitive::{Object, Plane, Primitive, Sphere, Surface};
pub use scene::{SceneError, SceneQuery, SceneResult, World};
