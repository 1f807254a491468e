//! GPU resource management: materials, textures, and global uniforms

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO};
pub use material::{Material, MaterialManager};
pub use texture_resource::TextureResource;
