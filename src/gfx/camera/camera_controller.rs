use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Velocities below this are snapped to zero to stop residual drift
const REST_THRESHOLD: f32 = 1e-4;

/// Damped orbit controls
///
/// Mouse drags and scroll wheel input are turned into angular and zoom
/// velocities rather than applied directly; [`CameraController::update`]
/// integrates the velocities each frame and decays them exponentially, so
/// the camera keeps gliding briefly after the input stops.
pub struct CameraController {
    /// Radians per second of orbit velocity added per pixel of drag
    pub rotate_speed: f32,
    /// Zoom velocity added per scroll line
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Exponential decay rate of control velocities, per second
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    is_mouse_pressed: bool,
    is_shift_held: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: 8.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            is_mouse_pressed: false,
            is_shift_held: false,
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // left mouse button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::Key(key_event) => {
                if let PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) =
                    key_event.physical_key
                {
                    self.is_shift_held = key_event.state == ElementState::Pressed;
                }
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.zoom_velocity += scroll_amount * self.zoom_speed;
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        // shift + drag pans the focus point, undamped
                        camera.pan((
                            -delta.0 as f32 * self.pan_speed,
                            delta.1 as f32 * self.pan_speed,
                        ));
                    } else {
                        self.yaw_velocity -= delta.0 as f32 * self.rotate_speed;
                        self.pitch_velocity += delta.1 as f32 * self.rotate_speed;
                    }
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    /// Integrates and decays control velocities over `delta` seconds
    pub fn update(&mut self, delta: f32, camera: &mut OrbitCamera) {
        if delta <= 0.0 {
            return;
        }

        if self.yaw_velocity.abs() > REST_THRESHOLD {
            camera.add_yaw(self.yaw_velocity * delta);
        }
        if self.pitch_velocity.abs() > REST_THRESHOLD {
            camera.add_pitch(self.pitch_velocity * delta);
        }
        if self.zoom_velocity.abs() > REST_THRESHOLD {
            camera.add_distance(self.zoom_velocity * delta);
        }

        let decay = (-self.damping * delta).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;

        for velocity in [
            &mut self.yaw_velocity,
            &mut self.pitch_velocity,
            &mut self.zoom_velocity,
        ] {
            if velocity.abs() < REST_THRESHOLD {
                *velocity = 0.0;
            }
        }
    }

    /// True while any control velocity is still decaying
    pub fn is_settling(&self) -> bool {
        self.yaw_velocity != 0.0 || self.pitch_velocity != 0.0 || self.zoom_velocity != 0.0
    }

    #[cfg(test)]
    fn kick(&mut self, yaw: f32, pitch: f32, zoom: f32) {
        self.yaw_velocity += yaw;
        self.pitch_velocity += pitch;
        self.zoom_velocity += zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.2, 0.3, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_velocity_decays_to_rest() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut cam = camera();
        controller.kick(1.0, 0.0, 0.0);

        for _ in 0..600 {
            controller.update(1.0 / 60.0, &mut cam);
        }
        assert!(!controller.is_settling());
    }

    #[test]
    fn test_orbit_applies_yaw() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut cam = camera();
        let yaw_before = cam.yaw;

        controller.kick(1.0, 0.0, 0.0);
        controller.update(1.0 / 60.0, &mut cam);
        assert!(cam.yaw > yaw_before);
    }

    #[test]
    fn test_damping_halts_faster_with_higher_rate() {
        let mut slow = CameraController::new(0.005, 0.1);
        let mut fast = CameraController::new(0.005, 0.1);
        fast.damping = 20.0;

        let mut cam_a = camera();
        let mut cam_b = camera();
        slow.kick(1.0, 0.0, 0.0);
        fast.kick(1.0, 0.0, 0.0);

        for _ in 0..30 {
            slow.update(1.0 / 60.0, &mut cam_a);
            fast.update(1.0 / 60.0, &mut cam_b);
        }
        assert!(cam_b.yaw < cam_a.yaw);
    }

    #[test]
    fn test_zero_delta_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut cam = camera();
        controller.kick(1.0, 1.0, 1.0);
        controller.update(0.0, &mut cam);
        assert!(controller.is_settling());
        assert_eq!(cam.yaw, camera().yaw);
    }
}
