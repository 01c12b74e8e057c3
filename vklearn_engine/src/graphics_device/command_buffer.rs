/// CommandPool and CommandBuffer traits - for recording rendering commands

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::{Buffer, Framebuffer, IndexType, Pipeline, RenderPass, ShaderStageFlags};

/// Viewport (floating point, may have a negative height to flip Y)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Integer rectangle (scissor, render area)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Clear value for one attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// RGBA color
    Color([f32; 4]),
    /// Depth and stencil
    DepthStencil { depth: f32, stencil: u32 },
}

/// Primary buffers are submitted to queues, secondary ones executed from primaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandBufferLevel {
    Primary,
    Secondary,
}

/// Command pool bound to one queue family
pub trait CommandPool: Send + Sync {
    /// Allocate one resettable command buffer
    fn allocate_command_buffer(&self, level: CommandBufferLevel) -> Result<Box<dyn CommandBuffer>>;

    fn as_any(&self) -> &dyn Any;
}

/// Command buffer for recording rendering commands
///
/// Recording is `reset` then `begin` .. `end`. The caller must make sure
/// the GPU is done with the previous recording before resetting.
pub trait CommandBuffer: Send + Sync {
    /// Discard the previous recording
    fn reset(&mut self) -> Result<()>;

    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Begin a render pass over `render_area` of `framebuffer`
    fn begin_render_pass(
        &mut self,
        render_pass: &dyn RenderPass,
        framebuffer: &dyn Framebuffer,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    /// End the current render pass
    fn end_render_pass(&mut self) -> Result<()>;

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &dyn Pipeline) -> Result<()>;

    /// Set the dynamic viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the dynamic scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Copy the first `size` bytes of `src` to the start of `dst` (outside a render pass)
    fn copy_buffer(&mut self, src: &dyn Buffer, dst: &dyn Buffer, size: u64) -> Result<()>;

    /// Bind a vertex buffer to binding 0
    fn bind_vertex_buffer(&mut self, buffer: &dyn Buffer, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &dyn Buffer, offset: u64, index_type: IndexType) -> Result<()>;

    /// Upload push constants through the layout of `pipeline`
    fn push_constants(
        &mut self,
        pipeline: &dyn Pipeline,
        stages: ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) -> Result<()>;

    /// Indexed draw
    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}
