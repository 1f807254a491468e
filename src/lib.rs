// src/lib.rs
//! Vitrine
//!
//! A small 3D scene viewer built on wgpu and winit: orbit camera with
//! damped controls, procedural primitives, environment maps (LDR cubemaps
//! and HDR panoramas), glTF models with skeletal animation playback, and
//! an ImGui debug panel. The demo programs under `demos/` each set up one
//! scene and drive it through the per-frame update hook.

pub mod app;
pub mod frame;
pub mod gfx;
pub mod model;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;

/// Creates a default viewer application instance
pub fn default() -> ViewerApp {
    ViewerApp::new()
}
