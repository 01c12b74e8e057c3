/// Spinning cube: one model, one entity, absolute rotation per update

use std::time::Duration;
use vklearn_engine::glam::Vec3;
use vklearn_engine::vklearn::{AppLogic, Result};
use vklearn_engine::vklearn::render::{ForwardRenderer, MeshData, ModelData};
use vklearn_engine::vklearn::scene::{Entity, EntityKey, Scene};
use vklearn_engine::vklearn::window::WindowSize;

const MODEL_ID: &str = "CubeModel";
const ENTITY_ID: &str = "CubeEntity";

/// Degrees added per update
const ROTATION_STEP: f32 = 1.0;

pub struct CubeDemo {
    angle: f32,
    cube: Option<EntityKey>,
}

impl Default for CubeDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeDemo {
    pub fn new() -> Self {
        Self { angle: 0.0, cube: None }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

pub fn cube_mesh() -> MeshData {
    MeshData {
        positions: vec![
            -0.5, 0.5, 0.5,
            -0.5, -0.5, 0.5,
            0.5, -0.5, 0.5,
            0.5, 0.5, 0.5,
            -0.5, 0.5, -0.5,
            0.5, 0.5, -0.5,
            -0.5, -0.5, -0.5,
            0.5, -0.5, -0.5,
        ],
        texture_coords: vec![
            0.0, 0.0,
            0.5, 0.0,
            1.0, 0.0,
            1.0, 0.5,
            1.0, 1.0,
            0.5, 1.0,
            0.0, 1.0,
            0.0, 0.5,
        ],
        indices: vec![
            // front
            0, 1, 3, 3, 1, 2,
            // top
            4, 0, 3, 5, 4, 3,
            // right
            3, 2, 7, 5, 3, 7,
            // left
            6, 1, 0, 6, 0, 4,
            // bottom
            2, 1, 6, 2, 6, 7,
            // back
            7, 6, 4, 7, 4, 5,
        ],
    }
}

impl AppLogic for CubeDemo {
    fn init(&mut self, _window: &WindowSize, scene: &mut Scene, renderer: &mut ForwardRenderer) -> Result<()> {
        renderer.load_models(&[ModelData::new(MODEL_ID, vec![cube_mesh()])])?;

        let mut cube = Entity::new(ENTITY_ID, MODEL_ID, Vec3::ZERO);
        cube.set_position(0.0, 0.0, -2.0);
        self.cube = Some(scene.add_entity(cube));
        Ok(())
    }

    fn update(&mut self, _elapsed: Duration, scene: &mut Scene) {
        self.angle += ROTATION_STEP;
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        }

        if let Some(cube) = self.cube.and_then(|key| scene.entity_mut(key)) {
            cube.rotate(self.angle.to_radians(), Vec3::ONE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vklearn_engine::glam::Quat;
    use vklearn_engine::vklearn::EngineConfig;

    fn scene_with_cube(demo: &mut CubeDemo) -> Scene {
        let mut scene = Scene::new(&WindowSize::new(800, 600), &EngineConfig::default());
        let cube = Entity::new(ENTITY_ID, MODEL_ID, Vec3::new(0.0, 0.0, -2.0));
        demo.cube = Some(scene.add_entity(cube));
        scene
    }

    #[test]
    fn test_cube_mesh_is_consistent() {
        let mesh = cube_mesh();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.texture_coords.len(), 16);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_update_rotates_by_one_degree() {
        let mut demo = CubeDemo::new();
        let mut scene = scene_with_cube(&mut demo);

        demo.update(Duration::from_millis(33), &mut scene);
        demo.update(Duration::from_millis(33), &mut scene);

        let key = demo.cube.unwrap();
        let rotation = scene.entity(key).unwrap().rotation();
        let expected = Quat::from_axis_angle(Vec3::ONE.normalize(), 2.0_f32.to_radians());
        assert!(rotation.abs_diff_eq(expected, 1e-5));
        assert_eq!(scene.entity(key).unwrap().position(), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_angle_wraps_at_full_turn() {
        let mut demo = CubeDemo::new();
        let mut scene = scene_with_cube(&mut demo);
        for _ in 0..360 {
            demo.update(Duration::ZERO, &mut scene);
        }
        assert_eq!(demo.angle(), 0.0);
    }

    #[test]
    fn test_update_without_entity_only_advances_angle() {
        let mut demo = CubeDemo::new();
        let mut scene = Scene::new(&WindowSize::new(800, 600), &EngineConfig::default());
        demo.update(Duration::ZERO, &mut scene);
        assert_eq!(demo.angle(), 1.0);
        assert_eq!(scene.entity_count(), 0);
    }
}
