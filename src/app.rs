use std::sync::Arc;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    frame::{FrameClock, FrameTiming},
    gfx::{
        camera::{
            camera_controller::CameraController, camera_utils::CameraManager,
            orbit_camera::OrbitCamera,
        },
        rendering::render_engine::RenderEngine,
        scene::Scene,
    },
    ui::UiManager,
};

/// Per-frame scene update hook, called before rendering with this frame's
/// timing. This is where demos oscillate lights or move objects.
pub type UpdateCallback = Box<dyn FnMut(&FrameTiming, &mut Scene)>;

/// UI build hook, called once per frame when set
pub type UiCallback = Box<dyn Fn(&imgui::Ui, &mut Scene)>;

/// The application shell: window, event loop, renderer, scene, UI
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    pub app_state: AppState,
}

pub struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    pub scene: Scene,
    clock: FrameClock,
    update_callback: Option<UpdateCallback>,
    ui_callback: Option<UiCallback>,
    title: String,
}

impl ViewerApp {
    /// Creates an application with a default orbit camera
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let camera = OrbitCamera::new(8.0, 0.4, 0.5, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let controller = CameraController::new(0.005, 0.6);
        let scene = Scene::new(CameraManager::new(camera, controller));

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                clock: FrameClock::new(),
                update_callback: None,
                ui_callback: None,
                title: "vitrine".to_string(),
            },
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.app_state.title = title.to_string();
    }

    /// Sets the per-frame update callback
    pub fn set_update<F>(&mut self, update: F)
    where
        F: FnMut(&FrameTiming, &mut Scene) + 'static,
    {
        self.app_state.update_callback = Some(Box::new(update));
    }

    /// Sets the UI build callback; without one no overlay is drawn
    pub fn set_ui<F>(&mut self, ui: F)
    where
        F: Fn(&imgui::Ui, &mut Scene) + 'static,
    {
        self.app_state.ui_callback = Some(Box::new(ui));
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    /// Runs the event loop; returns when the window closes
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        // The clock starts counting from here, not from construction
        self.app_state.clock = FrameClock::new();

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        if let Ok(window) = event_loop.create_window(attributes) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.scene
                .camera_manager
                .camera
                .resize_projection(width, height);
            self.scene
                .init_gpu_resources(renderer.device(), renderer.queue(), renderer.layouts());

            let ui_manager = UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            );

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // UI input first; captured events never reach the camera
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                // Keep the projection aspect and the surface in lockstep
                // with the window
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let timing = self.clock.tick();

                if let Some(update) = self.update_callback.as_mut() {
                    update(&timing, &mut self.scene);
                }
                self.scene.update(&timing);

                let has_ui = self.ui_callback.is_some();
                if let (Some(ui_manager), Some(ui_callback)) =
                    (self.ui_manager.as_mut(), self.ui_callback.as_ref())
                {
                    let scene = &mut self.scene;
                    ui_manager.update_logic(window, |ui| ui_callback(ui, scene));
                }

                render_engine.prepare_frame(&mut self.scene);

                if has_ui {
                    if let Some(ui_manager) = self.ui_manager.as_mut() {
                        render_engine.render_frame(
                            &self.scene,
                            Some(
                                |device: &wgpu::Device,
                                 queue: &wgpu::Queue,
                                 encoder: &mut wgpu::CommandEncoder,
                                 view: &wgpu::TextureView| {
                                    ui_manager.render(device, queue, encoder, view);
                                },
                            ),
                        );
                    }
                } else {
                    render_engine.render_frame_simple(&self.scene);
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Camera input is suppressed while the UI is interacting
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
