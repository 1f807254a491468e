use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Orbit camera parameterised by distance, yaw and pitch around a target
///
/// Y-up, right-handed. Yaw 0 looks down the +Z axis toward the target.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // recalculated in update()
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: cgmath::Rad(std::f32::consts::FRAC_PI_4),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        // Scale zoom steps with distance so zooming feels uniform
        let corrected = self.distance.max(1.0).log10().max(0.1) * delta;
        self.set_distance(self.distance + corrected);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Moves the focus point, keeping the orbit offset
    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
        self.update();
    }

    /// Places the camera at `eye` looking at `target`, deriving the orbit
    /// parameters from the offset between them
    pub fn look_from(&mut self, eye: Vector3<f32>, target: Vector3<f32>) {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);

        self.target = target;
        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
        self.update();
    }

    /// Pans the focus point relative to the current view direction
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance so panning covers the same screen fraction at
        // every zoom level
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Recomputes the eye position after distance/pitch/yaw changes
    fn update(&mut self) {
        self.eye = self.target
            + Vector3::new(
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                self.distance * self.pitch.cos() * self.yaw.cos(),
            );
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        let view_proj = self.build_view_projection_matrix();
        let inv_view_proj = view_proj.invert().unwrap_or_else(Matrix4::identity);

        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(view_proj);
        self.uniform.inv_view_proj = convert_matrix4_to_array(inv_view_proj);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(100.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_sits_at_distance_from_target() {
        let camera = OrbitCamera::new(5.0, 0.3, 1.2, Vector3::new(1.0, 2.0, 3.0), 1.0);
        let offset = camera.eye - camera.target;
        assert!((offset.magnitude() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_angles_look_down_positive_z() {
        let camera = OrbitCamera::new(4.0, 0.0, 0.0, Vector3::zero(), 1.0);
        assert!((camera.eye.x).abs() < 1e-5);
        assert!((camera.eye.y).abs() < 1e-5);
        assert!((camera.eye.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch <= camera.bounds.max_pitch);
        camera.add_pitch(-20.0);
        assert!(camera.pitch >= camera.bounds.min_pitch);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.resize_projection(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_from_reproduces_the_eye() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let eye = Vector3::new(4.0, 5.0, 4.0);
        let target = Vector3::new(0.0, 3.5, 0.0);
        camera.look_from(eye, target);

        assert!((camera.eye - eye).magnitude() < 1e-4);
        assert!((camera.target - target).magnitude() < 1e-6);
    }

    #[test]
    fn test_set_target_carries_the_eye_along() {
        let mut camera = OrbitCamera::new(5.0, 0.2, 0.7, Vector3::zero(), 1.0);
        let offset = camera.eye - camera.target;
        camera.set_target(Vector3::new(0.0, 2.0, 0.0));
        assert!(((camera.eye - camera.target) - offset).magnitude() < 1e-5);
    }

    #[test]
    fn test_pan_moves_eye_and_target_together() {
        let mut camera = OrbitCamera::new(5.0, 0.2, 0.7, Vector3::zero(), 1.0);
        let before = camera.target - camera.eye;
        camera.pan((0.5, -0.25));
        let after = camera.target - camera.eye;
        assert!((before - after).magnitude() < 1e-4);
    }

    #[test]
    fn test_view_proj_inverse_roundtrip() {
        let mut camera = OrbitCamera::new(6.0, 0.4, 0.9, Vector3::new(0.0, 1.0, 0.0), 1.6);
        camera.update_view_proj();

        let vp = Matrix4::from(camera.uniform.view_proj);
        let inv = Matrix4::from(camera.uniform.inv_view_proj);
        let identity = vp * inv;
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((identity[i][j] - expected).abs() < 1e-3);
            }
        }
    }
}
