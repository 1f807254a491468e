//! glTF model loader
//!
//! Loads .gltf/.glb files: node hierarchy, mesh primitives with skinning
//! attributes, PBR material factors, the first skin, and all animation
//! clips. Textures are not read; materials keep their factor values only.

use std::path::Path;

use cgmath::{Matrix4, Quaternion, Vector3};

use super::{
    animation::{AnimationClip, Channel, ChannelValues, Interpolation},
    Model, ModelError, Node, NodeTransform, Primitive, Skin, MAX_JOINTS,
};
use crate::gfx::scene::vertex::SkinnedVertex3D;

/// Loads a model from a .gltf or .glb file
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, ModelError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    let mut nodes: Vec<Node> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            Node {
                name: node.name().unwrap_or("").to_string(),
                parent: None,
                children: node.children().map(|child| child.index()).collect(),
                rest: NodeTransform {
                    translation: translation.into(),
                    // glTF quaternions are [x, y, z, w]
                    rotation: Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
                    scale: scale.into(),
                },
            }
        })
        .collect();

    for index in 0..nodes.len() {
        for child in nodes[index].children.clone() {
            nodes[child].parent = Some(index);
        }
    }

    let roots: Vec<usize> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|node| node.index()).collect(),
        None => nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| index)
            .collect(),
    };

    let skin = load_skin(&document, &buffers);

    if let Some(skin) = &skin {
        if skin.joints.len() > MAX_JOINTS {
            return Err(ModelError::PaletteOverflow {
                needed: skin.joints.len(),
            });
        }
    }

    let mut primitives = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let mesh_name = mesh.name().unwrap_or("unnamed").to_string();

        for (primitive_index, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| ModelError::MissingPositions {
                    mesh: mesh_name.clone(),
                })?
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(normals) => normals.collect(),
                None => compute_vertex_normals(&positions, &indices),
            };

            let joints: Option<Vec<[u16; 4]>> = reader
                .read_joints(0)
                .map(|joints| joints.into_u16().collect());
            let weights: Option<Vec<[f32; 4]>> = reader
                .read_weights(0)
                .map(|weights| weights.into_f32().collect());

            // Unskinned primitives reference a palette slot carrying their
            // node's global transform; see Model::joint_matrices.
            let fallback_joint = if skin.is_some() {
                0
            } else {
                node.index() as u32
            };
            if skin.is_some() && joints.is_none() {
                log::debug!(
                    "primitive '{}' has no joint data in a skinned model; binding to joint 0",
                    mesh_name
                );
            }

            let vertices: Vec<SkinnedVertex3D> = (0..positions.len())
                .map(|index| SkinnedVertex3D {
                    position: positions[index],
                    normal: normals.get(index).copied().unwrap_or([0.0, 1.0, 0.0]),
                    joints: match &joints {
                        Some(joints) => {
                            let j = joints[index];
                            [j[0] as u32, j[1] as u32, j[2] as u32, j[3] as u32]
                        }
                        None => [fallback_joint; 4],
                    },
                    weights: match &weights {
                        Some(weights) => weights[index],
                        None => [1.0, 0.0, 0.0, 0.0],
                    },
                })
                .collect();

            let pbr = primitive.material().pbr_metallic_roughness();

            primitives.push(Primitive {
                name: format!("{}#{}", mesh_name, primitive_index),
                node: node.index(),
                vertices,
                indices,
                base_color: pbr.base_color_factor(),
                metallic: pbr.metallic_factor(),
                roughness: pbr.roughness_factor(),
            });
        }
    }

    if skin.is_none() && nodes.len() > MAX_JOINTS {
        return Err(ModelError::PaletteOverflow {
            needed: nodes.len(),
        });
    }

    let animations = load_animations(&document, &buffers);

    log::info!(
        "loaded model '{}': {} nodes, {} primitives, {} clips{}",
        name,
        nodes.len(),
        primitives.len(),
        animations.len(),
        if skin.is_some() { ", skinned" } else { "" }
    );

    Ok(Model {
        name,
        nodes,
        roots,
        primitives,
        skin,
        animations,
    })
}

fn load_skin(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Option<Skin> {
    let skin = document.skins().next()?;

    let joints: Vec<usize> = skin.joints().map(|joint| joint.index()).collect();

    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let inverse_bind_matrices: Vec<Matrix4<f32>> = match reader.read_inverse_bind_matrices() {
        Some(matrices) => matrices.map(Matrix4::from).collect(),
        None => vec![Matrix4::from_scale(1.0); joints.len()],
    };

    Some(Skin {
        joints,
        inverse_bind_matrices,
    })
}

fn load_animations(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<AnimationClip> {
    let mut clips = Vec::new();

    for (animation_index, animation) in document.animations().enumerate() {
        let mut channels = Vec::new();
        let mut duration = 0.0f32;

        for channel in animation.channels() {
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(times) = reader.read_inputs().map(|inputs| inputs.collect::<Vec<f32>>())
            else {
                continue;
            };
            let Some(outputs) = reader.read_outputs() else {
                continue;
            };

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                // Cubic spline outputs are (in-tangent, value, out-tangent)
                // triples; keep the values and interpolate linearly
                gltf::animation::Interpolation::CubicSpline => Interpolation::Linear,
            };
            let cubic =
                channel.sampler().interpolation() == gltf::animation::Interpolation::CubicSpline;

            let values = match outputs {
                gltf::animation::util::ReadOutputs::Translations(translations) => {
                    ChannelValues::Translations(extract_vec3(translations, cubic))
                }
                gltf::animation::util::ReadOutputs::Scales(scales) => {
                    ChannelValues::Scales(extract_vec3(scales, cubic))
                }
                gltf::animation::util::ReadOutputs::Rotations(rotations) => {
                    let quats: Vec<Quaternion<f32>> = rotations
                        .into_f32()
                        .map(|q| Quaternion::new(q[3], q[0], q[1], q[2]))
                        .collect();
                    ChannelValues::Rotations(keep_keyframe_values(quats, cubic))
                }
                gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("skipping morph target channel (not supported)");
                    continue;
                }
            };

            if let Some(&last) = times.last() {
                duration = duration.max(last);
            }

            channels.push(Channel {
                node: channel.target().node().index(),
                interpolation,
                times,
                values,
            });
        }

        clips.push(AnimationClip {
            name: animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip_{}", animation_index)),
            duration,
            channels,
        });
    }

    clips
}

fn extract_vec3(
    values: impl Iterator<Item = [f32; 3]>,
    cubic: bool,
) -> Vec<Vector3<f32>> {
    keep_keyframe_values(values.map(Vector3::from).collect(), cubic)
}

/// For cubic spline samplers, keeps only the keyframe value out of each
/// (in-tangent, value, out-tangent) triple
fn keep_keyframe_values<T>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if !cubic {
        return values;
    }
    values
        .into_iter()
        .skip(1)
        .step_by(3)
        .collect()
}

/// Area-weighted vertex normals for primitives that ship without them
fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let a = positions[triangle[0] as usize];
        let b = positions[triangle[1] as usize];
        let c = positions[triangle[2] as usize];

        let edge1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let edge2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &vertex in triangle {
            let normal = &mut normals[vertex as usize];
            normal[0] += face_normal[0];
            normal[1] += face_normal[1];
            normal[2] += face_normal[2];
        }
    }

    for normal in &mut normals {
        let length =
            (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if length > 0.0 {
            normal[0] /= length;
            normal[1] /= length;
            normal[2] /= length;
        } else {
            *normal = [0.0, 1.0, 0.0];
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_spline_values_are_reduced_to_keyframes() {
        // Two keyframes, each as (in-tangent, value, out-tangent)
        let values = vec![0, 1, 2, 3, 4, 5];
        assert_eq!(keep_keyframe_values(values, true), vec![1, 4]);
    }

    #[test]
    fn test_linear_values_pass_through() {
        let values = vec![1, 2, 3];
        assert_eq!(keep_keyframe_values(values, false), vec![1, 2, 3]);
    }

    #[test]
    fn test_computed_normals_face_outward() {
        // A triangle in the XZ plane, counter-clockwise seen from +Y
        let positions = vec![[0.0, 0.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]];
        let indices = vec![0, 1, 2];

        let normals = compute_vertex_normals(&positions, &indices);
        for normal in normals {
            assert!((normal[1] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_computed_normals_are_unit_length_or_default() {
        let positions = vec![[0.0; 3]; 4];
        let indices = vec![0, 1, 2];

        // Degenerate triangle: falls back to +Y
        let normals = compute_vertex_normals(&positions, &indices);
        assert_eq!(normals[3], [0.0, 1.0, 0.0]);
        assert_eq!(normals[0], [0.0, 1.0, 0.0]);
    }
}
