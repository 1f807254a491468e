//! Global uniform bindings for camera, lighting, and environment state
//!
//! One uniform buffer holds all per-frame global data shared by every
//! pipeline: camera matrices, the light array, the ambient term, and the
//! environment map intensity. Bound to slot 0 everywhere.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    gfx::lighting::{AmbientLight, Light, LightUniform, MAX_LIGHTS},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content. Must match the `Globals` struct in the
/// shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    inv_view_proj: [[f32; 4]; 4],

    ambient_color: [f32; 3],
    ambient_intensity: f32,

    env_intensity: f32,
    light_count: u32,
    _padding: [f32; 2],

    lights: [LightUniform; MAX_LIGHTS],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Packs per-frame scene state into the global uniform buffer
///
/// Lights beyond [`MAX_LIGHTS`] do not fit the uniform array and are
/// silently truncated here; `Scene::add_light` warns when that happens.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &[Light],
    ambient: AmbientLight,
    env_intensity: f32,
) {
    let mut light_slots = [LightUniform::default(); MAX_LIGHTS];
    let light_count = lights.len().min(MAX_LIGHTS);
    for (slot, light) in light_slots.iter_mut().zip(lights.iter()) {
        *slot = light.to_uniform();
    }

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        inv_view_proj: camera.inv_view_proj,
        ambient_color: ambient.color,
        ambient_intensity: ambient.intensity,
        env_intensity,
        light_count: light_count as u32,
        _padding: [0.0; 2],
        lights: light_slots,
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Must be called once the uniform buffer exists, before rendering
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Globals Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_ubo_content_layout() {
        // vec4 + 2 mat4 + ambient block + counts block + light array
        let expected = 16 + 64 + 64 + 16 + 16 + MAX_LIGHTS * std::mem::size_of::<LightUniform>();
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), expected);
    }
}
