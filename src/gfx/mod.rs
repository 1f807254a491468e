//! # Graphics Module
//!
//! Everything the renderer draws and the state it draws it with:
//!
//! - **Camera** ([`camera`]) - orbit camera with damped controls
//! - **Geometry** ([`geometry`]) - procedural primitives (torus knot, cube,
//!   sphere, plane, torus)
//! - **Lighting** ([`lighting`]) - light types and sine oscillators
//! - **Environment** ([`environment`]) - cubemap and HDR panorama
//!   environments
//! - **Scene** ([`scene`]) - objects, materials, lights, model instances
//! - **Rendering** ([`rendering`]) - wgpu pipelines and draw passes
//! - **Resources** ([`resources`]) - materials, textures, global uniforms

pub mod camera;
pub mod environment;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use environment::Environment;
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
