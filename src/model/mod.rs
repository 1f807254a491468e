//! # Model Module
//!
//! glTF model loading and skeletal animation playback. A [`Model`] is the
//! immutable asset (nodes, primitives, skin, clips); a [`ModelInstance`]
//! places it in a scene with its own playback state and GPU resources.
//!
//! Every model primitive is drawn through the skinned pipeline: primitives
//! without a skin reference a palette slot holding their node's global
//! transform, so one vertex layout and one pipeline cover both cases.

pub mod animation;
pub mod loader;

pub use animation::{AnimationClip, AnimationPlayer, Channel, ChannelValues, Interpolation};
pub use loader::load_model;

use cgmath::{Matrix4, Quaternion, SquareMatrix, Vector3};

use crate::gfx::resources::material::Material;
use crate::gfx::scene::vertex::SkinnedVertex3D;
use crate::wgpu_utils::binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc};

/// Joint palette capacity of the skinning uniform
pub const MAX_JOINTS: usize = 96;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("mesh '{mesh}' has no position data")]
    MissingPositions { mesh: String },

    #[error("model needs {needed} palette slots but only {MAX_JOINTS} are available")]
    PaletteOverflow { needed: usize },
}

/// Local transform of a node, decomposed for animation
#[derive(Debug, Clone, Copy)]
pub struct NodeTransform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// A node in the model hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Rest transform; animation sampling starts from this
    pub rest: NodeTransform,
}

/// A skin: joint node indices and their inverse bind matrices
#[derive(Debug, Clone)]
pub struct Skin {
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Matrix4<f32>>,
}

/// One drawable primitive of a model
pub struct Primitive {
    pub name: String,
    pub node: usize,
    pub vertices: Vec<SkinnedVertex3D>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

/// An immutable model asset loaded from glTF
pub struct Model {
    pub name: String,
    pub nodes: Vec<Node>,
    pub roots: Vec<usize>,
    pub primitives: Vec<Primitive>,
    pub skin: Option<Skin>,
    pub animations: Vec<AnimationClip>,
}

impl Model {
    /// The rest pose: every node's local transform as authored
    pub fn rest_pose(&self) -> Vec<NodeTransform> {
        self.nodes.iter().map(|node| node.rest).collect()
    }

    /// Composes local transforms into global (model-space) matrices
    ///
    /// Children appear after their parents in glTF node order is not
    /// guaranteed, so the hierarchy is walked from the roots.
    pub fn global_transforms(&self, local: &[NodeTransform]) -> Vec<Matrix4<f32>> {
        let mut globals = vec![Matrix4::identity(); self.nodes.len()];
        let mut stack: Vec<(usize, Matrix4<f32>)> = self
            .roots
            .iter()
            .map(|&root| (root, Matrix4::identity()))
            .collect();

        while let Some((index, parent_global)) = stack.pop() {
            let global = parent_global * local[index].matrix();
            globals[index] = global;
            for &child in &self.nodes[index].children {
                stack.push((child, global));
            }
        }

        globals
    }

    /// Builds the joint-matrix palette for the current global transforms
    ///
    /// With a skin: `palette[i] = global(joint_i) * inverse_bind_i` (the
    /// skinned mesh node's own transform is ignored, per the glTF spec).
    /// Without one, the palette holds every node's global transform and
    /// primitives index it by node.
    pub fn joint_matrices(&self, globals: &[Matrix4<f32>]) -> Vec<Matrix4<f32>> {
        match &self.skin {
            Some(skin) => skin
                .joints
                .iter()
                .zip(skin.inverse_bind_matrices.iter())
                .map(|(&joint, inverse_bind)| globals[joint] * inverse_bind)
                .collect(),
            None => globals.to_vec(),
        }
    }

    pub fn clip_names(&self) -> Vec<&str> {
        self.animations.iter().map(|clip| clip.name.as_str()).collect()
    }

    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|clip| clip.name == name)
    }
}

struct PrimitiveGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_bind_group: wgpu::BindGroup,
}

struct ModelGpuResources {
    primitives: Vec<PrimitiveGpu>,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    palette_buffer: wgpu::Buffer,
    skin_bind_group: wgpu::BindGroup,
}

/// A model placed in a scene, with playback state and GPU resources
pub struct ModelInstance {
    pub model: Model,
    pub player: AnimationPlayer,
    pub transform: Matrix4<f32>,
    pub visible: bool,
    pose: Vec<NodeTransform>,
    palette: Vec<Matrix4<f32>>,
    gpu: Option<ModelGpuResources>,
}

impl ModelInstance {
    pub fn new(model: Model) -> Self {
        let pose = model.rest_pose();
        let globals = model.global_transforms(&pose);
        let palette = model.joint_matrices(&globals);

        Self {
            model,
            player: AnimationPlayer::new(),
            transform: Matrix4::identity(),
            visible: true,
            pose,
            palette,
            gpu: None,
        }
    }

    /// Advances playback and recomputes the joint palette
    pub fn update(&mut self, delta: f32) {
        self.player.advance(delta, &self.model.animations);

        self.pose = self.model.rest_pose();
        if let Some(clip) = self
            .player
            .current_clip()
            .and_then(|index| self.model.animations.get(index))
        {
            animation::sample_clip(clip, self.player.time, &mut self.pose);
        }

        let globals = self.model.global_transforms(&self.pose);
        self.palette = self.model.joint_matrices(&globals);
    }

    pub(crate) fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        transform_layout: &wgpu::BindGroupLayout,
        material_layout: &BindGroupLayoutWithDesc,
        skin_layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu.is_some() {
            return;
        }

        let primitives = self
            .model
            .primitives
            .iter()
            .map(|primitive| {
                let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Vertex Buffer", primitive.name)),
                        contents: bytemuck::cast_slice(&primitive.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                );
                let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Index Buffer", primitive.name)),
                        contents: bytemuck::cast_slice(&primitive.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    },
                );

                let material = Material::new(
                    &primitive.name,
                    primitive.base_color,
                    primitive.metallic,
                    primitive.roughness,
                );
                let material_buffer = wgpu::util::DeviceExt::create_buffer_init(
                    device,
                    &wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Material Buffer", primitive.name)),
                        contents: bytemuck::bytes_of(&material.to_uniform()),
                        usage: wgpu::BufferUsages::UNIFORM,
                    },
                );
                let material_bind_group = BindGroupBuilder::new(material_layout)
                    .resource(material_buffer.as_entire_binding())
                    .create(device, &format!("{} Material", primitive.name));

                PrimitiveGpu {
                    vertex_buffer,
                    index_buffer,
                    index_count: primitive.indices.len() as u32,
                    material_bind_group,
                }
            })
            .collect();

        let transform_data: &[f32; 16] = self.transform.as_ref();
        let transform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Model Transform Buffer"),
                contents: bytemuck::cast_slice(transform_data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Transform Bind Group"),
            layout: transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        let palette_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Joint Palette Buffer"),
            size: (MAX_JOINTS * std::mem::size_of::<[[f32; 4]; 4]>()) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let skin_bind_group = BindGroupBuilder::new(skin_layout)
            .resource(palette_buffer.as_entire_binding())
            .create(device, "Joint Palette Bind Group");

        self.gpu = Some(ModelGpuResources {
            primitives,
            transform_buffer,
            transform_bind_group,
            palette_buffer,
            skin_bind_group,
        });

        self.upload(queue);
    }

    /// Uploads the instance transform and the current joint palette
    pub(crate) fn upload(&self, queue: &wgpu::Queue) {
        let Some(gpu) = &self.gpu else {
            return;
        };

        let transform_data: &[f32; 16] = self.transform.as_ref();
        queue.write_buffer(
            &gpu.transform_buffer,
            0,
            bytemuck::cast_slice(transform_data),
        );

        let matrices: Vec<[[f32; 4]; 4]> = self
            .palette
            .iter()
            .take(MAX_JOINTS)
            .map(|matrix| (*matrix).into())
            .collect();
        queue.write_buffer(&gpu.palette_buffer, 0, bytemuck::cast_slice(&matrices));
    }

    pub(crate) fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let Some(gpu) = &self.gpu else {
            return;
        };

        render_pass.set_bind_group(1, &gpu.transform_bind_group, &[]);
        render_pass.set_bind_group(3, &gpu.skin_bind_group, &[]);

        for primitive in &gpu.primitives {
            render_pass.set_bind_group(2, &primitive.material_bind_group, &[]);
            render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            render_pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..primitive.index_count, 0, 0..1);
        }
    }

    #[cfg(test)]
    pub(crate) fn palette(&self) -> &[Matrix4<f32>] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Rotation3, Zero};

    fn two_bone_model() -> Model {
        // root -> child, child offset 2 along Y
        let nodes = vec![
            Node {
                name: "root".to_string(),
                parent: None,
                children: vec![1],
                rest: NodeTransform::identity(),
            },
            Node {
                name: "child".to_string(),
                parent: Some(0),
                children: vec![],
                rest: NodeTransform {
                    translation: Vector3::new(0.0, 2.0, 0.0),
                    rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
                    scale: Vector3::new(1.0, 1.0, 1.0),
                },
            },
        ];

        Model {
            name: "rig".to_string(),
            nodes,
            roots: vec![0],
            primitives: vec![],
            skin: Some(Skin {
                joints: vec![0, 1],
                inverse_bind_matrices: vec![Matrix4::identity(); 2],
            }),
            animations: vec![],
        }
    }

    #[test]
    fn test_global_transforms_compose_down_the_hierarchy() {
        let model = two_bone_model();
        let mut pose = model.rest_pose();
        pose[0].translation = Vector3::new(1.0, 0.0, 0.0);

        let globals = model.global_transforms(&pose);
        assert_eq!(globals[1].w.x, 1.0);
        assert_eq!(globals[1].w.y, 2.0);
    }

    #[test]
    fn test_joint_matrices_with_identity_bind_follow_globals() {
        let model = two_bone_model();
        let pose = model.rest_pose();
        let globals = model.global_transforms(&pose);
        let palette = model.joint_matrices(&globals);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette[1].w.y, 2.0);
    }

    #[test]
    fn test_parent_rotation_moves_child_origin() {
        let model = two_bone_model();
        let mut pose = model.rest_pose();
        pose[0].rotation = Quaternion::from_angle_z(Rad(-std::f32::consts::FRAC_PI_2));

        let globals = model.global_transforms(&pose);
        // Child was at +2 Y; rotating the root -90 degrees about Z moves it to +2 X
        assert!((globals[1].w.x - 2.0).abs() < 1e-5);
        assert!(globals[1].w.y.abs() < 1e-5);
    }

    #[test]
    fn test_unskinned_palette_holds_node_globals() {
        let mut model = two_bone_model();
        model.skin = None;

        let pose = model.rest_pose();
        let globals = model.global_transforms(&pose);
        let palette = model.joint_matrices(&globals);

        assert_eq!(palette.len(), model.nodes.len());
        assert_eq!(palette[1].w.y, 2.0);
    }

    #[test]
    fn test_instance_update_applies_clip() {
        let mut model = two_bone_model();
        model.animations = vec![AnimationClip {
            name: "raise".to_string(),
            duration: 1.0,
            channels: vec![Channel {
                node: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: ChannelValues::Translations(vec![
                    Vector3::zero(),
                    Vector3::new(0.0, 3.0, 0.0),
                ]),
            }],
        }];

        let mut instance = ModelInstance::new(model);
        instance.player.play(0);
        instance.update(0.5);

        // Root raised 1.5, child rides along at +2 local
        assert!((instance.palette()[0].w.y - 1.5).abs() < 1e-5);
        assert!((instance.palette()[1].w.y - 3.5).abs() < 1e-5);
    }
}
