//! WGPU-based render engine
//!
//! Owns the surface, device, depth buffer, bind group layouts, and the
//! three render pipelines (lit meshes, skinned models, skybox). Each frame
//! is a single depth-cleared pass followed by an optional UI overlay pass.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        texture_resource::TextureResource,
    },
    scene::{object::DrawObject, scene::Scene, vertex::SkinnedVertex3D},
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Bind group layouts shared between the engine and scene resources
pub struct RenderLayouts {
    /// Slot 1: per-object/model transform
    pub transform: wgpu::BindGroupLayout,
    /// Slot 2: material factors
    pub material: BindGroupLayoutWithDesc,
    /// Slot 3 (lit) / slot 1 (skybox): environment cubemap + sampler
    pub environment: BindGroupLayoutWithDesc,
    /// Slot 3 (skinned): joint-matrix palette
    pub skin: BindGroupLayoutWithDesc,
}

/// Core rendering engine managing GPU resources and draw passes
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    layouts: RenderLayouts,

    // Bound in the environment slot when the scene has no environment
    #[allow(dead_code)]
    fallback_env_texture: TextureResource,
    fallback_env_bind_group: wgpu::BindGroup,

    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Panics
    /// Panics if no suitable wgpu adapter or device is available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    // Float32 filtering keeps HDR environment cubemaps on
                    // the same sampling path as LDR ones
                    required_features: wgpu::Features::FLOAT32_FILTERABLE,
                    required_limits: wgpu::Limits {
                        max_texture_dimension_2d: 4096,
                        ..wgpu::Limits::downlevel_defaults()
                    },
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .expect("Failed to request a device!")
        };

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // Fifo matches the display refresh, like the frame callbacks
            // the demos are paced by
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // Shared bind group layouts
        let transform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");

        let environment_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_cube())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Environment Bind Group Layout");

        let skin_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Skin Bind Group Layout");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        // A 1x1 black cubemap stands in when the scene has no environment
        let black = [0u8, 0, 0, 255];
        let fallback_env_texture = TextureResource::create_cubemap(
            &device,
            &queue,
            1,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            &[&black, &black, &black, &black, &black, &black],
            "Fallback Environment",
        );
        let fallback_env_bind_group = BindGroupBuilder::new(&environment_layout)
            .texture(&fallback_env_texture.view)
            .sampler(&fallback_env_texture.sampler)
            .create(&device, "Fallback Environment Bind Group");

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("lit", include_str!("lit.wgsl"));
        pipeline_manager.load_shader("skinned", include_str!("skinned.wgsl"));
        pipeline_manager.load_shader("skybox", include_str!("skybox.wgsl"));

        let color_target = Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        });

        pipeline_manager.register_pipeline(
            "Lit",
            PipelineConfig::default()
                .with_label("LIT")
                .with_shader("lit")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_color_targets(vec![color_target.clone()])
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    transform_layout.clone(),
                    material_layout.layout.clone(),
                    environment_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            "Skinned",
            PipelineConfig::default()
                .with_label("SKINNED")
                .with_shader("skinned")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_color_targets(vec![color_target.clone()])
                .with_vertex_layout(Some(SkinnedVertex3D::desc()))
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    transform_layout.clone(),
                    material_layout.layout.clone(),
                    skin_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            "Skybox",
            PipelineConfig::default()
                .with_label("SKYBOX")
                .with_shader("skybox")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_read_only_depth()
                .with_color_targets(vec![color_target])
                .with_vertex_layout(None)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    environment_layout.layout.clone(),
                ]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            layouts: RenderLayouts {
                transform: transform_layout,
                material: material_layout,
                environment: environment_layout,
                skin: skin_layout,
            },
            fallback_env_texture,
            fallback_env_bind_group,
            clear_color: wgpu::Color {
                r: 0.012,
                g: 0.014,
                b: 0.022,
                a: 1.0,
            },
        }
    }

    /// Uploads per-frame scene state: globals, materials, transforms, and
    /// joint palettes
    pub fn prepare_frame(&mut self, scene: &mut Scene) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera_manager.camera.uniform,
            &scene.lights,
            scene.ambient,
            scene.environment_intensity(),
        );

        scene.material_manager.update_all_gpu_resources(
            &self.device,
            &self.queue,
            &self.layouts.material,
        );

        for object in &scene.objects {
            object.update_transform(&self.queue);
        }
        for instance in &scene.models {
            instance.upload(&self.queue);
        }
    }

    /// Renders one frame with an optional UI overlay pass
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(error) => {
                log::warn!("dropping frame: {}", error);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            let environment_bind_group = scene
                .environment
                .as_ref()
                .and_then(|environment| environment.bind_group())
                .unwrap_or(&self.fallback_env_bind_group);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("Lit") {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(3, environment_bind_group, &[]);

                for object in scene.objects.iter().filter(|object| object.visible) {
                    let Some(gpu) = &object.gpu_resources else {
                        continue;
                    };
                    let material = scene.material_for_object(object);
                    let Some(material_bind_group) = material.bind_group() else {
                        log::debug!(
                            "skipping '{}': material '{}' has no GPU resources",
                            object.name,
                            material.name
                        );
                        continue;
                    };

                    render_pass.set_bind_group(1, &gpu.transform_bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.draw_object(object);
                }
            }

            if !scene.models.is_empty() {
                if let Some(pipeline) = self.pipeline_manager.get_pipeline("Skinned") {
                    render_pass.set_pipeline(pipeline);

                    for instance in scene.models.iter().filter(|instance| instance.visible) {
                        instance.draw(&mut render_pass);
                    }
                }
            }

            // Background last among the 3D passes: the depth test discards
            // everything already covered by geometry
            if scene.environment.is_some() {
                if let Some(pipeline) = self.pipeline_manager.get_pipeline("Skybox") {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, environment_bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Convenience method for rendering without a UI overlay
    pub fn render_frame_simple(&mut self, scene: &Scene) {
        self.render_frame(
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        );
    }

    /// Resizes the surface and recreates the depth buffer to match
    ///
    /// Zero-sized dimensions (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Current surface dimensions in pixels
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn layouts(&self) -> &RenderLayouts {
        &self.layouts
    }
}
