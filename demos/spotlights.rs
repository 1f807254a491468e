//! # Spotlights
//!
//! Three colored spotlights aimed at a group of pillars, each intensity
//! modulated by a sine wave at its own frequency and phase. The camera
//! target height also bobs slowly with elapsed time.
//!
//! ```bash
//! cargo run --example spotlights
//! ```

use rand::Rng;
use vitrine::prelude::*;

fn main() {
    env_logger::init();

    let mut app = vitrine::default();
    app.set_title("vitrine - spotlights");

    let scene = app.scene_mut();
    scene.ambient.intensity = 0.015;

    scene.add_material_rgb("floor", 0.25, 0.25, 0.28, 0.0, 0.95);
    let floor = scene.add_object("floor", &generate_plane(30.0, 30.0, 1, 1));
    floor.set_material("floor");

    scene.add_material_rgb("pillar", 0.85, 0.85, 0.85, 0.05, 0.5);
    let cube = generate_cube();
    let mut rng = rand::rng();
    for index in 0..7 {
        let angle = index as f32 / 7.0 * std::f32::consts::TAU;
        let radius = 2.2 + rng.random_range(-0.4..0.4);
        let height = rng.random_range(1.2..3.0);

        let pillar = scene.add_object(&format!("pillar_{}", index), &cube);
        pillar.set_material("pillar");
        pillar.set_translation(Vector3::new(
            radius * angle.cos(),
            height / 2.0,
            radius * angle.sin(),
        ));
        pillar.transform = pillar.transform
            * cgmath::Matrix4::from_nonuniform_scale(0.6, height, 0.6);
    }

    let colors = [
        ("red", [1.0, 0.15, 0.1]),
        ("green", [0.15, 1.0, 0.2]),
        ("blue", [0.2, 0.3, 1.0]),
    ];
    for (index, (name, color)) in colors.iter().enumerate() {
        let angle = index as f32 / 3.0 * std::f32::consts::TAU;
        scene.add_light(Light::spot(
            name,
            Vector3::new(6.0 * angle.cos(), 7.0, 6.0 * angle.sin()),
            Vector3::new(0.0, 0.5, 0.0),
            *color,
            60.0,
            30.0,
            0.45,
        ));
    }

    // A warm point light wandering above the pillars
    scene.add_light(Light::point(
        "wanderer",
        Vector3::new(0.0, 4.5, 0.0),
        [1.0, 0.85, 0.6],
        18.0,
        14.0,
    ));

    scene
        .camera_manager
        .camera
        .look_from(Vector3::new(9.0, 6.0, 9.0), Vector3::new(0.0, 1.0, 0.0));

    // Per-spot waves: same base, staggered phases and frequencies
    let waves = [
        IntensityWave::new(60.0, 45.0, 0.21),
        IntensityWave::new(60.0, 45.0, 0.17).with_phase(2.1),
        IntensityWave::new(60.0, 45.0, 0.13).with_phase(4.2),
    ];
    let orbit = OrbitPath::new(Vector3::new(0.0, 4.5, 0.0), 4.0, 0.08).with_bob(0.8);

    app.set_update(move |timing, scene| {
        for (light, wave) in scene.lights.iter_mut().zip(waves.iter()) {
            light.intensity = wave.sample(timing.elapsed);
        }
        if let Some(light) = scene.light_by_name("wanderer") {
            light.position = orbit.sample(timing.elapsed);
        }

        // Slow vertical bob of the focus point
        let camera = &mut scene.camera_manager.camera;
        let mut target = camera.target;
        target.y = 1.0 + 0.5 * (0.1 * std::f32::consts::TAU * timing.elapsed).sin();
        camera.set_target(target);
    });

    app.set_ui(|ui, scene| scene_panel(ui, scene));

    app.run();
}
