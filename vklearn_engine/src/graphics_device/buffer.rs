/// Buffer trait and buffer descriptor

use std::any::Any;
use crate::error::Result;

/// Buffer usage
///
/// Vertex and index buffers live in device-local memory and are filled by
/// a copy from a staging buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer, transfer destination
    Vertex,
    /// Index buffer, transfer destination
    Index,
    /// Host-visible transfer source
    Staging,
}

impl BufferUsage {
    /// Whether `Buffer::update` can write into buffers of this usage
    pub fn is_host_visible(&self) -> bool {
        matches!(self, BufferUsage::Staging)
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Buffer data format for vertex attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    R32_SFLOAT,           // float (4 bytes)
    R32G32_SFLOAT,        // vec2 (8 bytes)
    R32G32B32_SFLOAT,     // vec3 (12 bytes)
    R32G32B32A32_SFLOAT,  // vec4 (16 bytes)
}

impl BufferFormat {
    /// Size of one element in bytes
    pub fn size(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT => 4,
            BufferFormat::R32G32_SFLOAT => 8,
            BufferFormat::R32G32B32_SFLOAT => 12,
            BufferFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

/// GPU buffer
pub trait Buffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Write `data` at `offset`; only host-visible (staging) buffers accept writes
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
