//! Environment maps
//!
//! An [`Environment`] wraps a cubemap texture used two ways: sampled by the
//! background pass as a skybox, and sampled by the lit mesh shader as an
//! ambient/reflection source scaled by `intensity` (the value the debug
//! panel exposes).
//!
//! Two sources are supported: six LDR face images, and an equirectangular
//! HDR panorama which is resampled into cubemap faces at load time.

use std::f32::consts::{PI, TAU};
use std::path::Path;

use crate::gfx::resources::texture_resource::TextureResource;
use crate::wgpu_utils::binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc};

/// Face order matches the wgpu cubemap layer order
const FACE_COUNT: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("cubemap face {face} is {got_width}x{got_height}, expected {expected}x{expected}")]
    FaceSizeMismatch {
        face: usize,
        expected: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error("cubemap faces must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
}

struct EnvironmentGpu {
    #[allow(dead_code)]
    texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// A cubemap environment with an adjustable intensity scalar
pub struct Environment {
    pub intensity: f32,
    size: u32,
    format: wgpu::TextureFormat,
    bytes_per_texel: u32,
    faces: Vec<Vec<u8>>,
    gpu: Option<EnvironmentGpu>,
}

impl Environment {
    /// Loads six LDR face images in +X, -X, +Y, -Y, +Z, -Z order
    pub fn from_cubemap_faces<P: AsRef<Path>>(paths: &[P; 6]) -> Result<Self, EnvironmentError> {
        let mut faces = Vec::with_capacity(FACE_COUNT);
        let mut size = 0u32;

        for (index, path) in paths.iter().enumerate() {
            let face = image::open(path)?.into_rgba8();
            let (width, height) = face.dimensions();

            if width != height {
                return Err(EnvironmentError::NotSquare { width, height });
            }
            if index == 0 {
                size = width;
            } else if width != size || height != size {
                return Err(EnvironmentError::FaceSizeMismatch {
                    face: index,
                    expected: size,
                    got_width: width,
                    got_height: height,
                });
            }

            faces.push(face.into_raw());
        }

        log::info!("loaded cubemap environment ({0}x{0} faces)", size);

        Ok(Self {
            intensity: 1.0,
            size,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            bytes_per_texel: 4,
            faces,
            gpu: None,
        })
    }

    /// Loads an equirectangular HDR panorama and resamples it into a cubemap
    pub fn from_equirect_hdr<P: AsRef<Path>>(path: P) -> Result<Self, EnvironmentError> {
        let panorama = image::open(path)?.into_rgb32f();
        let (width, height) = panorama.dimensions();

        // Half the panorama height preserves roughly one source texel per
        // cubemap texel at the equator
        let face_size = (height / 2).max(16);
        let faces = equirect_to_faces(panorama.as_raw(), width, height, face_size);

        log::info!(
            "resampled {}x{} HDR panorama into {2}x{2} cubemap faces",
            width,
            height,
            face_size
        );

        Ok(Self {
            intensity: 1.0,
            size: face_size,
            format: wgpu::TextureFormat::Rgba32Float,
            bytes_per_texel: 16,
            faces,
            gpu: None,
        })
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_hdr(&self) -> bool {
        self.format == wgpu::TextureFormat::Rgba32Float
    }

    /// Uploads the cubemap and builds the environment bind group
    pub(crate) fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu.is_some() {
            return;
        }

        let face_refs: [&[u8]; 6] = [
            &self.faces[0],
            &self.faces[1],
            &self.faces[2],
            &self.faces[3],
            &self.faces[4],
            &self.faces[5],
        ];

        let texture = TextureResource::create_cubemap(
            device,
            queue,
            self.size,
            self.format,
            self.bytes_per_texel,
            &face_refs,
            "Environment Cubemap",
        );

        let bind_group = BindGroupBuilder::new(layout)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, "Environment Bind Group");

        self.gpu = Some(EnvironmentGpu {
            texture,
            bind_group,
        });
    }

    pub(crate) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// World-space direction through a cubemap face texel, `u`/`v` in [0, 1]
fn face_direction(face: usize, u: f32, v: f32) -> [f32; 3] {
    let a = 2.0 * u - 1.0;
    let b = 2.0 * v - 1.0;
    match face {
        0 => [1.0, -b, -a],  // +X
        1 => [-1.0, -b, a],  // -X
        2 => [a, 1.0, b],    // +Y
        3 => [a, -1.0, -b],  // -Y
        4 => [a, -b, 1.0],   // +Z
        _ => [-a, -b, -1.0], // -Z
    }
}

/// Maps a direction to equirectangular texture coordinates in [0, 1]
fn equirect_uv(dir: [f32; 3]) -> (f32, f32) {
    let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2])
        .sqrt()
        .max(f32::EPSILON);
    let u = 0.5 + dir[2].atan2(dir[0]) / TAU;
    let v = (dir[1] / len).clamp(-1.0, 1.0).acos() / PI;
    (u, v)
}

/// Bilinear sample of an RGB f32 panorama, wrapping in u and clamping in v
fn sample_equirect(pixels: &[f32], width: u32, height: u32, u: f32, v: f32) -> [f32; 3] {
    let x = u * width as f32 - 0.5;
    let y = v * height as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let wrap_x = |x: i64| -> u32 { x.rem_euclid(width as i64) as u32 };
    let clamp_y = |y: i64| -> u32 { y.clamp(0, height as i64 - 1) as u32 };

    let texel = |x: u32, y: u32| -> [f32; 3] {
        let offset = ((y * width + x) * 3) as usize;
        [pixels[offset], pixels[offset + 1], pixels[offset + 2]]
    };

    let p00 = texel(wrap_x(x0 as i64), clamp_y(y0 as i64));
    let p10 = texel(wrap_x(x0 as i64 + 1), clamp_y(y0 as i64));
    let p01 = texel(wrap_x(x0 as i64), clamp_y(y0 as i64 + 1));
    let p11 = texel(wrap_x(x0 as i64 + 1), clamp_y(y0 as i64 + 1));

    let mut result = [0.0f32; 3];
    for channel in 0..3 {
        let top = p00[channel] * (1.0 - fx) + p10[channel] * fx;
        let bottom = p01[channel] * (1.0 - fx) + p11[channel] * fx;
        result[channel] = top * (1.0 - fy) + bottom * fy;
    }
    result
}

/// Resamples an equirectangular RGB f32 panorama into six RGBA f32 faces
fn equirect_to_faces(pixels: &[f32], width: u32, height: u32, face_size: u32) -> Vec<Vec<u8>> {
    let mut faces = Vec::with_capacity(FACE_COUNT);

    for face in 0..FACE_COUNT {
        let mut texels: Vec<f32> = Vec::with_capacity((face_size * face_size * 4) as usize);

        for y in 0..face_size {
            let v = (y as f32 + 0.5) / face_size as f32;
            for x in 0..face_size {
                let u = (x as f32 + 0.5) / face_size as f32;

                let dir = face_direction(face, u, v);
                let (pu, pv) = equirect_uv(dir);
                let rgb = sample_equirect(pixels, width, height, pu, pv);

                texels.extend_from_slice(&rgb);
                texels.push(1.0);
            }
        }

        faces.push(bytemuck::cast_slice(&texels).to_vec());
    }

    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_centers_point_along_axes() {
        let expected = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, axis) in expected.iter().enumerate() {
            let dir = face_direction(face, 0.5, 0.5);
            for i in 0..3 {
                assert!((dir[i] - axis[i]).abs() < 1e-6, "face {}", face);
            }
        }
    }

    #[test]
    fn test_equirect_uv_poles() {
        let (_, v_top) = equirect_uv([0.0, 1.0, 0.0]);
        let (_, v_bottom) = equirect_uv([0.0, -1.0, 0.0]);
        assert!(v_top.abs() < 1e-6);
        assert!((v_bottom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_equirect_uv_equator_wraps() {
        let (u_px, v) = equirect_uv([1.0, 0.0, 0.0]);
        assert!((v - 0.5).abs() < 1e-6);
        assert!((u_px - 0.5).abs() < 1e-6);

        let (u_pz, _) = equirect_uv([0.0, 0.0, 1.0]);
        assert!((u_pz - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_constant_panorama_gives_constant_faces() {
        let width = 8u32;
        let height = 4u32;
        let pixels: Vec<f32> = std::iter::repeat([0.25f32, 0.5, 0.75])
            .take((width * height) as usize)
            .flatten()
            .collect();

        let faces = equirect_to_faces(&pixels, width, height, 16);
        assert_eq!(faces.len(), 6);

        for face in &faces {
            let texels: &[f32] = bytemuck::cast_slice(face);
            assert_eq!(texels.len(), 16 * 16 * 4);
            for rgba in texels.chunks(4) {
                assert!((rgba[0] - 0.25).abs() < 1e-4);
                assert!((rgba[1] - 0.5).abs() < 1e-4);
                assert!((rgba[2] - 0.75).abs() < 1e-4);
                assert_eq!(rgba[3], 1.0);
            }
        }
    }

    #[test]
    fn test_bilinear_sample_interpolates() {
        // 2x1 image: black then white
        let pixels = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mid = sample_equirect(&pixels, 2, 1, 0.5, 0.5);
        assert!((mid[0] - 0.5).abs() < 1e-4);
    }
}
