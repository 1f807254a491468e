//! # Animated Model
//!
//! Loads a glTF model with a skeleton and plays its animation clips,
//! advancing playback by the frame delta time. The debug panel switches
//! clips and playback speed.
//!
//! Expects a model at `assets/models/fox.glb` (any skinned glTF works).
//!
//! ```bash
//! cargo run --example animated_model
//! ```

use anyhow::Context;
use vitrine::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let model = load_model("assets/models/fox.glb")
        .context("loading model from assets/models/fox.glb")?;
    let clip_count = model.animations.len();

    let mut app = vitrine::default();
    app.set_title("vitrine - animated model");

    let scene = app.scene_mut();

    scene.add_material_rgb("floor", 0.35, 0.4, 0.35, 0.0, 0.85);
    let floor = scene.add_object("floor", &generate_plane(30.0, 30.0, 1, 1));
    floor.set_material("floor");

    scene.add_light(Light::directional(
        "sun",
        Vector3::new(-0.3, -1.0, -0.5),
        [1.0, 0.97, 0.9],
        2.2,
    ));
    scene.ambient.intensity = 0.15;

    let instance = scene.add_model(model);
    // The Fox sample model is authored at centimeter scale
    instance.transform = cgmath::Matrix4::from_scale(0.025);
    if clip_count > 0 {
        instance.player.play(0);
    }

    scene
        .camera_manager
        .camera
        .look_from(Vector3::new(4.5, 3.0, 6.0), Vector3::new(0.0, 1.2, 0.0));

    app.set_ui(|ui, scene| scene_panel(ui, scene));

    app.run();
    Ok(())
}
