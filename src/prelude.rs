//! # Vitrine Prelude
//!
//! Brings the types a typical demo needs into scope:
//!
//! ```no_run
//! use vitrine::prelude::*;
//!
//! fn main() {
//!     let mut app = vitrine::default();
//!     app.scene_mut().add_object("knot", &generate_torus_knot(1.0, 0.4, 100, 16, 2, 3));
//!     app.run();
//! }
//! ```

// Application shell
pub use crate::app::ViewerApp;
pub use crate::default;
pub use crate::frame::FrameTiming;

// Scene building
pub use crate::gfx::environment::Environment;
pub use crate::gfx::geometry::{
    generate_cube, generate_plane, generate_sphere, generate_torus, generate_torus_knot,
    GeometryData,
};
pub use crate::gfx::lighting::{AmbientLight, IntensityWave, Light, LightKind, OrbitPath};
pub use crate::gfx::scene::Scene;

// Models and animation
pub use crate::model::{load_model, AnimationPlayer, Model, ModelInstance};

// UI
pub use crate::ui::scene_panel;

// Common external types
pub use cgmath::{Deg, InnerSpace, Vector3, Zero};
pub use imgui::Ui;
