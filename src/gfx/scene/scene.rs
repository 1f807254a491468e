use wgpu::Device;

use super::object::Object;
use crate::{
    frame::FrameTiming,
    gfx::{
        camera::camera_utils::CameraManager,
        environment::Environment,
        geometry::GeometryData,
        lighting::{AmbientLight, Light, MAX_LIGHTS},
        rendering::render_engine::RenderLayouts,
        resources::material::{Material, MaterialManager},
    },
    model::{Model, ModelInstance},
};

/// Everything drawn each frame: objects, lights, environment, models, camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,
    pub ambient: AmbientLight,
    pub environment: Option<Environment>,
    pub models: Vec<ModelInstance>,
    pub material_manager: MaterialManager,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: AmbientLight::default(),
            environment: None,
            models: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Per-frame update: damped camera controls, camera matrices, and
    /// animation playback for every model instance
    pub fn update(&mut self, timing: &FrameTiming) {
        self.camera_manager.update(timing.delta);
        self.camera_manager.camera.update_view_proj();

        for instance in &mut self.models {
            instance.update(timing.delta);
        }
    }

    /// Adds an object built from procedural geometry
    pub fn add_object(&mut self, name: &str, geometry: &GeometryData) -> &mut Object {
        let unique_name = self.ensure_unique_name(name);
        let mut object = Object::from_geometry(geometry);
        object.set_name(unique_name);
        self.objects.push(object);
        self.objects.last_mut().unwrap()
    }

    /// Creates a material and registers it under its name
    pub fn add_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        self.material_manager
            .add_material(Material::new(name, base_color, metallic, roughness));
        self.material_manager.get_material_mut(name).unwrap()
    }

    /// Convenience wrapper taking an RGB color with full alpha
    pub fn add_material_rgb(
        &mut self,
        name: &str,
        r: f32,
        g: f32,
        b: f32,
        metallic: f32,
        roughness: f32,
    ) -> &mut Material {
        self.add_material(name, [r, g, b, 1.0], metallic, roughness)
    }

    /// Adds a light. Lights past the uniform capacity never reach the GPU.
    pub fn add_light(&mut self, light: Light) -> &mut Light {
        if self.lights.len() >= MAX_LIGHTS {
            log::warn!(
                "light '{}' exceeds the {} supported lights and will not be rendered",
                light.name,
                MAX_LIGHTS
            );
        }
        self.lights.push(light);
        self.lights.last_mut().unwrap()
    }

    pub fn light_by_name(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|light| light.name == name)
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = Some(environment);
    }

    /// The environment intensity scalar, zero when no environment is set
    pub fn environment_intensity(&self) -> f32 {
        self.environment
            .as_ref()
            .map_or(0.0, |environment| environment.intensity)
    }

    /// Adds an animated model instance to the scene
    pub fn add_model(&mut self, model: Model) -> &mut ModelInstance {
        self.models.push(ModelInstance::new(model));
        self.models.last_mut().unwrap()
    }

    /// Initializes GPU resources for objects, materials, environment, and
    /// model instances. Must be called once the device exists.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &RenderLayouts,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, &layouts.transform);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, &layouts.material);

        if let Some(environment) = &mut self.environment {
            environment.init_gpu_resources(device, queue, &layouts.environment);
        }

        for instance in &mut self.models {
            instance.init_gpu_resources(
                device,
                queue,
                &layouts.transform,
                &layouts.material,
                &layouts.skin,
            );
        }
    }

    /// Resolves the material to draw an object with
    pub fn material_for_object(&self, object: &Object) -> &Material {
        self.material_manager.material_for(object.material_id())
    }

    pub fn object_by_name(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|object| object.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }

    /// Totals for debug display
    pub fn statistics(&self) -> SceneStatistics {
        let object_triangles: u32 = self
            .objects
            .iter()
            .map(|object| {
                object
                    .meshes
                    .iter()
                    .map(|mesh| mesh.index_count() / 3)
                    .sum::<u32>()
            })
            .sum();
        let model_triangles: u32 = self
            .models
            .iter()
            .map(|instance| {
                instance
                    .model
                    .primitives
                    .iter()
                    .map(|primitive| primitive.indices.len() as u32 / 3)
                    .sum::<u32>()
            })
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            model_count: self.models.len(),
            light_count: self.lights.len(),
            total_triangles: object_triangles + model_triangles,
        }
    }
}

/// Scene totals for debugging and UI display
#[derive(Debug)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub model_count: usize,
    pub light_count: usize,
    pub total_triangles: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{camera_controller::CameraController, orbit_camera::OrbitCamera},
        geometry::generate_cube,
    };
    use cgmath::{Vector3, Zero};

    fn scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.3, 0.3, Vector3::zero(), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        Scene::new(CameraManager::new(camera, controller))
    }

    #[test]
    fn test_object_names_are_made_unique() {
        let mut scene = scene();
        let cube = generate_cube();
        scene.add_object("crate", &cube);
        scene.add_object("crate", &cube);

        assert_eq!(scene.objects[0].name, "crate");
        assert_eq!(scene.objects[1].name, "crate (1)");
    }

    #[test]
    fn test_environment_intensity_defaults_to_zero() {
        let scene = scene();
        assert_eq!(scene.environment_intensity(), 0.0);
    }

    #[test]
    fn test_update_advances_camera_and_matrices() {
        let mut scene = scene();
        let timing = FrameTiming {
            elapsed: 1.0,
            delta: 1.0 / 60.0,
        };
        scene.update(&timing);

        let uniform = scene.camera_manager.camera.uniform;
        // View-projection was rebuilt from the default identity
        assert_ne!(uniform.view_proj, [[0.0; 4]; 4]);
        assert_eq!(uniform.view_position[3], 1.0);
    }

    #[test]
    fn test_statistics_count_objects_and_lights() {
        let mut scene = scene();
        scene.add_object("crate", &generate_cube());
        scene.add_light(Light::point(
            "bulb",
            Vector3::new(0.0, 2.0, 0.0),
            [1.0, 1.0, 1.0],
            5.0,
            10.0,
        ));

        let stats = scene.statistics();
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.total_triangles, 12);
    }
}
