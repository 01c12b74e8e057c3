/// Perspective projection recomputed on every resize

use glam::Mat4;
use crate::config::EngineConfig;

/// Right-handed perspective with depth mapped to [0, 1]
#[derive(Debug, Clone)]
pub struct Projection {
    fov: f32,
    z_near: f32,
    z_far: f32,
    matrix: Mat4,
}

impl Projection {
    /// `config.fov` is in degrees
    pub fn new(width: u32, height: u32, config: &EngineConfig) -> Self {
        let mut projection = Self {
            fov: config.fov.to_radians(),
            z_near: config.z_near,
            z_far: config.z_far,
            matrix: Mat4::IDENTITY,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // a zero height happens while minimized; the matrix is rebuilt on restore
        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        self.matrix = Mat4::perspective_rh(self.fov, aspect, self.z_near, self.z_far);
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
