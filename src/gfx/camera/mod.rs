//! # Camera Module
//!
//! Orbit camera with damped mouse controls. The controller accumulates
//! mouse input into velocities which decay every frame, giving the camera
//! the smoothed feel of typical viewer applications.

pub mod camera_controller;
pub mod camera_utils;
pub mod orbit_camera;

pub use camera_controller::CameraController;
pub use camera_utils::{Camera, CameraManager, CameraUniform};
pub use orbit_camera::OrbitCamera;
