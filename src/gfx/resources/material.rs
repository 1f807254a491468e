//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and referenced by
//! name from scene objects. An object with no material, or a dangling
//! reference, falls back to the manager's default material.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
    uniform_buffer::UniformBuffer,
};

/// GPU uniform data for materials. Must match the `Material` struct in the
/// shaders exactly (48 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding0: [f32; 2],
    pub emissive: [f32; 3],
    _padding1: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Surface description with simple PBR factors
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],

    // GPU resources, shared by all objects using this material
    ubo: Option<MaterialUBO>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            ubo: None,
            bind_group: None,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
            ubo: None,
            bind_group: None,
        }
    }

    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            _padding0: [0.0; 2],
            emissive: self.emissive,
            _padding1: 0.0,
        }
    }

    /// Creates or refreshes the material's uniform buffer and bind group
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.to_uniform();

        if let Some(ubo) = &mut self.ubo {
            ubo.update_content(queue, uniform);
            return;
        }

        let ubo = MaterialUBO::new_with_data(device, &uniform);
        self.bind_group = Some(
            BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .create(device, &format!("Material '{}'", self.name)),
        );
        self.ubo = Some(ubo);
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// Central material storage, keyed by material name
pub struct MaterialManager {
    materials: HashMap<String, Material>,
    default_material: Material,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn get_material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// Resolves an object's material reference, falling back to the default
    pub fn material_for(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or(&self.default_material)
    }

    pub fn list_materials(&self) -> Vec<&String> {
        self.materials.keys().collect()
    }

    /// Syncs every material (including the default) to the GPU
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        self.default_material
            .update_gpu_resources(device, queue, layout);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let manager = MaterialManager::new();
        let material = manager.material_for(Some("missing"));
        assert_eq!(material.name, "Default");
        assert_eq!(manager.material_for(None).name, "Default");
    }

    #[test]
    fn test_added_material_is_resolved_by_name() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("gold", [1.0, 0.8, 0.2, 1.0], 1.0, 0.3));

        let material = manager.material_for(Some("gold"));
        assert_eq!(material.name, "gold");
        assert_eq!(material.metallic, 1.0);
    }

    #[test]
    fn test_factors_are_clamped() {
        let material = Material::new("odd", [1.0; 4], 3.0, -1.0);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn test_material_uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }
}
