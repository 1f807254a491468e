//! Rendering pipeline: wgpu setup, pipeline management, and the per-frame
//! draw passes (lit meshes, skinned models, skybox, UI overlay).

pub mod pipeline_manager;
pub mod render_engine;

pub use render_engine::{RenderEngine, RenderLayouts};
