//! Scene lights and light animation
//!
//! Lights live on the [`Scene`](crate::gfx::scene::Scene) as plain data and
//! are packed into a fixed-size uniform array each frame. The oscillator
//! helpers implement the sine-driven intensity and position animation the
//! demo scenes use.

use cgmath::{InnerSpace, Vector3};
use std::f32::consts::TAU;

/// Number of light slots in the global uniform; extra lights are dropped
pub const MAX_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    fn shader_id(self) -> f32 {
        match self {
            LightKind::Directional => 0.0,
            LightKind::Point => 1.0,
            LightKind::Spot => 2.0,
        }
    }
}

/// A single scene light
#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub position: Vector3<f32>,
    /// Direction the light points, unit length. Ignored for point lights.
    pub direction: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which point/spot falloff reaches zero
    pub range: f32,
    /// Full-brightness half-angle of the spot cone, radians
    pub inner_angle: f32,
    /// Cutoff half-angle of the spot cone, radians
    pub outer_angle: f32,
}

impl Light {
    pub fn directional(name: &str, direction: Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: LightKind::Directional,
            position: Vector3::new(0.0, 0.0, 0.0),
            direction: direction.normalize(),
            color,
            intensity,
            range: f32::MAX,
            inner_angle: 0.0,
            outer_angle: 0.0,
        }
    }

    pub fn point(
        name: &str,
        position: Vector3<f32>,
        color: [f32; 3],
        intensity: f32,
        range: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: LightKind::Point,
            position,
            direction: Vector3::new(0.0, -1.0, 0.0),
            color,
            intensity,
            range,
            inner_angle: 0.0,
            outer_angle: 0.0,
        }
    }

    pub fn spot(
        name: &str,
        position: Vector3<f32>,
        target: Vector3<f32>,
        color: [f32; 3],
        intensity: f32,
        range: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: LightKind::Spot,
            position,
            direction: (target - position).normalize(),
            color,
            intensity,
            range,
            // Soft edge over the outer quarter of the cone
            inner_angle: outer_angle * 0.75,
            outer_angle,
        }
    }

    /// Re-aims a spot or directional light at a target point
    pub fn aim_at(&mut self, target: Vector3<f32>) {
        self.direction = (target - self.position).normalize();
    }

    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position.into(),
            kind: self.kind.shader_id(),
            direction: self.direction.into(),
            range: self.range,
            color: self.color,
            intensity: self.intensity,
            cone_cos: [self.inner_angle.cos(), self.outer_angle.cos()],
            _padding: [0.0; 2],
        }
    }
}

/// GPU layout for one light slot. Must match the `Light` struct in the
/// shaders exactly (64 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub kind: f32,
    pub direction: [f32; 3],
    pub range: f32,
    pub color: [f32; 3],
    pub intensity: f32,
    pub cone_cos: [f32; 2],
    _padding: [f32; 2],
}

impl Default for LightUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

/// Uniform ambient term applied to every surface
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.05,
        }
    }
}

/// Sine-modulated intensity: `base + amplitude * sin(tau * frequency * t + phase)`
///
/// The sampled value is clamped at zero so deep modulation cannot produce a
/// negative intensity.
#[derive(Debug, Clone, Copy)]
pub struct IntensityWave {
    pub base: f32,
    pub amplitude: f32,
    /// Oscillations per second
    pub frequency: f32,
    pub phase: f32,
}

impl IntensityWave {
    pub fn new(base: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            base,
            amplitude,
            frequency,
            phase: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn sample(&self, elapsed: f32) -> f32 {
        (self.base + self.amplitude * (TAU * self.frequency * elapsed + self.phase).sin()).max(0.0)
    }
}

/// Circular orbit in the XZ plane with an optional vertical sine bob
#[derive(Debug, Clone, Copy)]
pub struct OrbitPath {
    pub center: Vector3<f32>,
    pub radius: f32,
    /// Revolutions per second
    pub frequency: f32,
    pub phase: f32,
    /// Amplitude of the vertical oscillation, at twice the orbit frequency
    pub bob_amplitude: f32,
}

impl OrbitPath {
    pub fn new(center: Vector3<f32>, radius: f32, frequency: f32) -> Self {
        Self {
            center,
            radius,
            frequency,
            phase: 0.0,
            bob_amplitude: 0.0,
        }
    }

    pub fn with_bob(mut self, amplitude: f32) -> Self {
        self.bob_amplitude = amplitude;
        self
    }

    pub fn sample(&self, elapsed: f32) -> Vector3<f32> {
        let angle = TAU * self.frequency * elapsed + self.phase;
        Vector3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.bob_amplitude * (2.0 * angle).sin(),
            self.center.z + self.radius * angle.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    #[test]
    fn test_intensity_wave_oscillates_around_base() {
        let wave = IntensityWave::new(2.0, 0.5, 1.0);
        assert!((wave.sample(0.0) - 2.0).abs() < 1e-5);
        assert!((wave.sample(0.25) - 2.5).abs() < 1e-5);
        assert!((wave.sample(0.75) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_intensity_wave_never_negative() {
        let wave = IntensityWave::new(0.5, 2.0, 1.0);
        for i in 0..100 {
            assert!(wave.sample(i as f32 * 0.03) >= 0.0);
        }
    }

    #[test]
    fn test_phase_offsets_shift_the_wave() {
        let a = IntensityWave::new(1.0, 1.0, 1.0);
        let b = IntensityWave::new(1.0, 1.0, 1.0).with_phase(std::f32::consts::PI);
        let t = 0.1;
        // Opposite phases mirror around the base
        assert!((a.sample(t) + b.sample(t) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_path_keeps_radius() {
        let path = OrbitPath::new(Vector3::new(1.0, 2.0, 3.0), 4.0, 0.2);
        for i in 0..20 {
            let pos = path.sample(i as f32 * 0.3);
            let planar = Vector3::new(pos.x - 1.0, 0.0, pos.z - 3.0);
            assert!((planar.magnitude() - 4.0).abs() < 1e-4);
            assert_eq!(pos.y, 2.0);
        }
    }

    #[test]
    fn test_spot_light_aims_at_target() {
        let light = Light::spot(
            "key",
            Vector3::new(0.0, 5.0, 0.0),
            Vector3::zero(),
            [1.0, 1.0, 1.0],
            10.0,
            20.0,
            0.5,
        );
        assert!((light.direction - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-5);
        assert!(light.inner_angle < light.outer_angle);
    }

    #[test]
    fn test_light_uniform_is_64_bytes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
    }
}
