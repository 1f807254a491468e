//! # Scene Management Module
//!
//! The scene owns everything the renderer draws each frame: static objects
//! with materials, lights, an optional environment map, animated model
//! instances, and the camera.

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::Scene;
pub use vertex::{SkinnedVertex3D, Vertex3D};
