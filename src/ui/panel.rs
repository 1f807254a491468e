// src/ui/panel.rs
//! Default scene debug panel
//!
//! One window exposing the tweakable scene state: environment map
//! intensity, ambient and per-light controls, and animation playback for
//! loaded models.

use imgui::Ui;

use crate::gfx::scene::Scene;

/// Draws the scene debug panel. Wire it in with
/// `app.set_ui(|ui, scene| scene_panel(ui, scene))`.
pub fn scene_panel(ui: &Ui, scene: &mut Scene) {
    ui.window("Scene")
        .size([320.0, 380.0], imgui::Condition::FirstUseEver)
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let stats = scene.statistics();
            ui.text(format!(
                "{} objects, {} lights, {} triangles",
                stats.object_count, stats.light_count, stats.total_triangles
            ));
            let framerate = ui.io().framerate;
            ui.text(format!(
                "{:.2} ms/frame ({:.0} fps)",
                1000.0 / framerate.max(1.0),
                framerate
            ));
            ui.separator();

            if let Some(environment) = &mut scene.environment {
                ui.text("Environment");
                ui.slider("intensity", 0.0, 4.0, &mut environment.intensity);
                ui.spacing();
            }

            ui.text("Ambient");
            ui.slider("ambient intensity", 0.0, 1.0, &mut scene.ambient.intensity);
            ui.spacing();

            if !scene.lights.is_empty() {
                ui.text("Lights");
                for (index, light) in scene.lights.iter_mut().enumerate() {
                    let _id = ui.push_id_usize(index);
                    ui.slider(
                        format!("{} intensity", light.name),
                        0.0,
                        120.0,
                        &mut light.intensity,
                    );
                    ui.color_edit3(format!("{} color", light.name), &mut light.color);
                }
                ui.spacing();
            }

            for (index, instance) in scene.models.iter_mut().enumerate() {
                let _id = ui.push_id_usize(index);
                let clip_names: Vec<String> = instance
                    .model
                    .clip_names()
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                if clip_names.is_empty() {
                    continue;
                }

                ui.text(format!("Animation: {}", instance.model.name));

                let mut selected = instance.player.current_clip().unwrap_or(0);
                if ui.combo_simple_string("clip", &mut selected, &clip_names) {
                    instance.player.play(selected);
                }

                ui.checkbox("playing", &mut instance.player.playing);
                ui.slider("speed", 0.0, 3.0, &mut instance.player.speed);
            }
        });
}
