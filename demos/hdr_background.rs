//! # HDR Background
//!
//! An equirectangular HDR panorama resampled into a cubemap at load time,
//! shown as the background and feeding ambient light and reflections. The
//! intensity slider in the debug panel scales both.
//!
//! Expects a panorama at `assets/environment/studio.hdr`.
//!
//! ```bash
//! cargo run --example hdr_background
//! ```

use anyhow::Context;
use vitrine::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let environment = Environment::from_equirect_hdr("assets/environment/studio.hdr")
        .context("loading panorama from assets/environment/studio.hdr")?
        .with_intensity(1.2);

    let mut app = vitrine::default();
    app.set_title("vitrine - HDR background");

    let scene = app.scene_mut();
    scene.set_environment(environment);
    scene.ambient.intensity = 0.0;

    scene.add_material("chrome", [0.95, 0.95, 0.95, 1.0], 1.0, 0.05);
    let knot = scene.add_object("knot", &generate_torus_knot(1.0, 0.4, 128, 24, 2, 3));
    knot.set_material("chrome");
    knot.set_translation(Vector3::new(0.0, 0.0, 0.0));

    scene
        .camera_manager
        .camera
        .look_from(Vector3::new(3.5, 1.5, 3.5), Vector3::new(0.0, 0.0, 0.0));

    app.set_ui(|ui, scene| scene_panel(ui, scene));

    app.run();
    Ok(())
}
