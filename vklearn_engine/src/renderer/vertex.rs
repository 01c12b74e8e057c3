/// Interleaved vertex layout: position (vec3) then texture coordinates (vec2)

use crate::graphics_device::{BufferFormat, VertexAttribute, VertexBinding, VertexInputRate, VertexLayout};

/// Floats per interleaved vertex
pub const FLOATS_PER_VERTEX: usize = 5;

/// Bytes between consecutive vertices
pub const VERTEX_STRIDE: u32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u32;

pub fn forward_vertex_layout() -> VertexLayout {
    VertexLayout {
        bindings: vec![VertexBinding {
            binding: 0,
            stride: VERTEX_STRIDE,
            input_rate: VertexInputRate::Vertex,
        }],
        attributes: vec![
            // position
            VertexAttribute {
                location: 0,
                binding: 0,
                format: BufferFormat::R32G32B32_SFLOAT,
                offset: 0,
            },
            // uv
            VertexAttribute {
                location: 1,
                binding: 0,
                format: BufferFormat::R32G32_SFLOAT,
                offset: BufferFormat::R32G32B32_SFLOAT.size(),
            },
        ],
    }
}
