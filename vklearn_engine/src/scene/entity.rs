/// Entity - one drawable instance of a model

use glam::{Mat4, Quat, Vec3};

/// A placed instance of a model.
///
/// The model matrix is kept in sync with position, rotation and scale on
/// every mutation and is always `translation * rotation * scale`.
#[derive(Debug, Clone)]
pub struct Entity {
    id: String,
    model_id: String,
    position: Vec3,
    rotation: Quat,
    scale: f32,
    model_matrix: Mat4,
}

impl Entity {
    pub fn new(id: impl Into<String>, model_id: impl Into<String>, position: Vec3) -> Self {
        let mut entity = Self {
            id: id.into(),
            model_id: model_id.into(),
            position,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            model_matrix: Mat4::IDENTITY,
        };
        entity.update_model_matrix();
        entity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        self.update_model_matrix();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.update_model_matrix();
    }

    /// Set the rotation to `angle` radians about `axis`
    ///
    /// Absolute, not cumulative: the previous rotation is discarded. The
    /// axis does not need to be normalized; a zero axis resets the rotation.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.rotation = match axis.try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, angle),
            None => Quat::IDENTITY,
        };
        self.update_model_matrix();
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = Quat::IDENTITY;
        self.update_model_matrix();
    }

    fn update_model_matrix(&mut self) {
        self.model_matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        );
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
