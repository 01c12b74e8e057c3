/// Per-draw push constant block
///
/// Two column-major 4x4 float matrices, projection first: 128 bytes at
/// offset 0, visible to the vertex stage only.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use crate::graphics_device::{PushConstantRange, ShaderStageFlags};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EntityPushConstants {
    pub projection: Mat4,
    pub model: Mat4,
}

impl EntityPushConstants {
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    pub fn new(projection: &Mat4, model: &Mat4) -> Self {
        Self { projection: *projection, model: *model }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Range declared in the pipeline layout
    pub fn range() -> PushConstantRange {
        PushConstantRange {
            stages: ShaderStageFlags::VERTEX,
            offset: 0,
            size: Self::SIZE,
        }
    }
}
