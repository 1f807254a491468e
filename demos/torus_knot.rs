//! # Torus Knot
//!
//! The base scene: a torus knot floating above a floor plane, an orbit
//! camera with damped controls, and window resizing that keeps the
//! projection aspect in sync.
//!
//! ```bash
//! cargo run --example torus_knot
//! ```

use vitrine::prelude::*;

fn main() {
    env_logger::init();

    let mut app = vitrine::default();
    app.set_title("vitrine - torus knot");

    let scene = app.scene_mut();

    scene.add_material_rgb("knot", 0.92, 0.92, 0.92, 0.1, 0.35);
    scene.add_material_rgb("floor", 0.4, 0.42, 0.45, 0.0, 0.9);

    let knot = scene.add_object("knot", &generate_torus_knot(1.0, 0.4, 100, 16, 2, 3));
    knot.set_material("knot");
    knot.set_translation(Vector3::new(0.0, 4.0, 0.0));

    let floor = scene.add_object("floor", &generate_plane(24.0, 24.0, 1, 1));
    floor.set_material("floor");

    scene.add_light(Light::directional(
        "sun",
        Vector3::new(-0.4, -1.0, -0.3),
        [1.0, 1.0, 1.0],
        2.0,
    ));
    scene.ambient.intensity = 0.08;

    scene
        .camera_manager
        .camera
        .look_from(Vector3::new(4.0, 5.0, 4.0), Vector3::new(0.0, 3.5, 0.0));

    app.run();
}
