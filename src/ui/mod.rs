//! # UI Module
//!
//! ImGui overlay: platform/renderer glue in [`manager`], and the default
//! scene debug panel (environment intensity, lights, animation playback)
//! in [`panel`].

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::scene_panel;
