//! # Environment Map
//!
//! A cubemap environment used both as the background and as an ambient and
//! reflection source for a grid of spheres sweeping metallic/roughness
//! values. The environment intensity is adjustable in the debug panel.
//!
//! Expects six face images under `assets/environment/`:
//! `px.png nx.png py.png ny.png pz.png nz.png`.
//!
//! ```bash
//! cargo run --example environment
//! ```

use anyhow::Context;
use vitrine::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let faces = [
        "assets/environment/px.png",
        "assets/environment/nx.png",
        "assets/environment/py.png",
        "assets/environment/ny.png",
        "assets/environment/pz.png",
        "assets/environment/nz.png",
    ];
    let environment = Environment::from_cubemap_faces(&faces)
        .context("loading cubemap faces from assets/environment/")?;

    let mut app = vitrine::default();
    app.set_title("vitrine - environment map");

    let scene = app.scene_mut();
    scene.set_environment(environment);
    scene.ambient.intensity = 0.02;

    scene.add_light(Light::directional(
        "key",
        Vector3::new(-0.5, -0.8, -0.2),
        [1.0, 0.98, 0.92],
        1.5,
    ));

    // 3x3 grid: metallic increases left to right, roughness front to back
    let sphere = generate_sphere(48, 32);
    for row in 0..3 {
        for column in 0..3 {
            let name = format!("sphere_{}_{}", row, column);
            let metallic = column as f32 / 2.0;
            let roughness = (row as f32 / 2.0).max(0.05);

            scene.add_material(&name, [0.9, 0.9, 0.9, 1.0], metallic, roughness);
            let object = scene.add_object(&name, &sphere);
            object.set_material(&name);
            object.set_translation(Vector3::new(
                (column as f32 - 1.0) * 2.6,
                1.2,
                (row as f32 - 1.0) * 2.6,
            ));
        }
    }

    scene
        .camera_manager
        .camera
        .look_from(Vector3::new(7.0, 5.0, 7.0), Vector3::new(0.0, 1.0, 0.0));

    app.set_ui(|ui, scene| scene_panel(ui, scene));

    app.run();
    Ok(())
}
