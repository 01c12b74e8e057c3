/// CommandPool and CommandBuffer - Vulkan implementations of the recording traits

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::{
    Buffer as GraphicsBuffer, ClearValue, CommandBuffer as GraphicsCommandBuffer,
    CommandBufferLevel, CommandPool as GraphicsCommandPool, Framebuffer as GraphicsFramebuffer,
    IndexType, Pipeline as GraphicsPipeline, Rect2D, RenderPass as GraphicsRenderPass,
    ShaderStageFlags, Viewport,
};
use vklearn_engine::engine_err;

use crate::vulkan::{rect_to_vk, shader_stages_to_vk};
use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::VulkanContext;
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;

/// Command pool on the graphics family, buffers individually resettable
pub struct CommandPool {
    pub(crate) command_pool: vk::CommandPool,
    context: Arc<VulkanContext>,
}

impl CommandPool {
    pub(crate) fn new(context: Arc<VulkanContext>) -> Result<Arc<Self>> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(context.graphics_queue_family)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        let command_pool = unsafe {
            context.device
                .create_command_pool(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create command pool: {:?}", e))?
        };

        Ok(Arc::new(Self { command_pool, context }))
    }
}

impl GraphicsCommandPool for CommandPool {
    fn allocate_command_buffer(&self, level: CommandBufferLevel) -> Result<Box<dyn GraphicsCommandBuffer>> {
        let vk_level = match level {
            CommandBufferLevel::Primary => vk::CommandBufferLevel::PRIMARY,
            CommandBufferLevel::Secondary => vk::CommandBufferLevel::SECONDARY,
        };
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.command_pool)
            .level(vk_level)
            .command_buffer_count(1);

        let command_buffers = unsafe {
            self.context.device
                .allocate_command_buffers(&allocate_info)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to allocate command buffer: {:?}", e))?
        };
        let command_buffer = command_buffers
            .into_iter()
            .next()
            .ok_or_else(|| Error::BackendError("Driver returned no command buffer".to_string()))?;

        Ok(Box::new(CommandBuffer {
            command_buffer,
            command_pool: self.command_pool,
            context: Arc::clone(&self.context),
            is_recording: false,
            in_render_pass: false,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for CommandPool {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_command_pool(self.command_pool, None);
        }
    }
}

/// Vulkan command buffer
///
/// Must be dropped before the pool it was allocated from.
pub struct CommandBuffer {
    command_buffer: vk::CommandBuffer,
    command_pool: vk::CommandPool,
    context: Arc<VulkanContext>,
    is_recording: bool,
    in_render_pass: bool,
}

impl CommandBuffer {
    pub(crate) fn downcast(command_buffer: &dyn GraphicsCommandBuffer) -> Result<vk::CommandBuffer> {
        let command_buffer = command_buffer
            .as_any()
            .downcast_ref::<CommandBuffer>()
            .ok_or_else(|| crate::vulkan::foreign_resource("command buffer"))?;
        if command_buffer.is_recording {
            return Err(Error::BackendError("Command buffer submitted while recording".to_string()));
        }
        Ok(command_buffer.command_buffer)
    }

    fn check_recording(&self) -> Result<()> {
        if !self.is_recording {
            return Err(Error::BackendError("Command buffer not recording".to_string()));
        }
        Ok(())
    }
}

impl GraphicsCommandBuffer for CommandBuffer {
    fn reset(&mut self) -> Result<()> {
        unsafe {
            self.context.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to reset command buffer: {:?}", e))?;
        }
        self.is_recording = false;
        self.in_render_pass = false;
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        if self.is_recording {
            return Err(Error::BackendError("Command buffer already recording".to_string()));
        }

        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        unsafe {
            self.context.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to begin command buffer: {:?}", e))?;
        }
        self.is_recording = true;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.check_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Render pass not ended before ending command buffer".to_string()));
        }

        unsafe {
            self.context.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to end command buffer: {:?}", e))?;
        }
        self.is_recording = false;
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &dyn GraphicsRenderPass,
        framebuffer: &dyn GraphicsFramebuffer,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.check_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Already inside a render pass".to_string()));
        }

        let vk_clear_values: Vec<vk::ClearValue> = clear_values
            .iter()
            .map(|value| match *value {
                ClearValue::Color(float32) => vk::ClearValue {
                    color: vk::ClearColorValue { float32 },
                },
                ClearValue::DepthStencil { depth, stencil } => vk::ClearValue {
                    depth_stencil: vk::ClearDepthStencilValue { depth, stencil },
                },
            })
            .collect();

        let begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(RenderPass::downcast(render_pass)?)
            .framebuffer(Framebuffer::downcast(framebuffer)?)
            .render_area(rect_to_vk(render_area))
            .clear_values(&vk_clear_values);

        unsafe {
            self.context.device
                .cmd_begin_render_pass(self.command_buffer, &begin_info, vk::SubpassContents::INLINE);
        }
        self.in_render_pass = true;
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        if !self.in_render_pass {
            return Err(Error::BackendError("Not inside a render pass".to_string()));
        }

        unsafe {
            self.context.device.cmd_end_render_pass(self.command_buffer);
        }
        self.in_render_pass = false;
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &dyn GraphicsPipeline) -> Result<()> {
        self.check_recording()?;
        let pipeline = Pipeline::downcast(pipeline)?;

        unsafe {
            self.context.device.cmd_bind_pipeline(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline.pipeline,
            );
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.check_recording()?;
        let vk_viewport = vk::Viewport {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
            min_depth: viewport.min_depth,
            max_depth: viewport.max_depth,
        };

        unsafe {
            self.context.device.cmd_set_viewport(self.command_buffer, 0, &[vk_viewport]);
        }
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.check_recording()?;

        unsafe {
            self.context.device.cmd_set_scissor(self.command_buffer, 0, &[rect_to_vk(scissor)]);
        }
        Ok(())
    }

    fn copy_buffer(&mut self, src: &dyn GraphicsBuffer, dst: &dyn GraphicsBuffer, size: u64) -> Result<()> {
        self.check_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Buffer copies are not allowed inside a render pass".to_string()));
        }
        if size > src.size() || size > dst.size() {
            return Err(Error::InvalidResource(format!(
                "Copy of {} bytes exceeds source ({}) or destination ({}) size",
                size, src.size(), dst.size()
            )));
        }
        let src = Buffer::downcast(src)?;
        let dst = Buffer::downcast(dst)?;

        unsafe {
            let region = vk::BufferCopy { src_offset: 0, dst_offset: 0, size };
            self.context.device.cmd_copy_buffer(self.command_buffer, src, dst, &[region]);
        }
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &dyn GraphicsBuffer, offset: u64) -> Result<()> {
        self.check_recording()?;
        let buffer = Buffer::downcast(buffer)?;

        unsafe {
            self.context.device.cmd_bind_vertex_buffers(self.command_buffer, 0, &[buffer], &[offset]);
        }
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &dyn GraphicsBuffer, offset: u64, index_type: IndexType) -> Result<()> {
        self.check_recording()?;
        let buffer = Buffer::downcast(buffer)?;
        let vk_index_type = match index_type {
            IndexType::U16 => vk::IndexType::UINT16,
            IndexType::U32 => vk::IndexType::UINT32,
        };

        unsafe {
            self.context.device.cmd_bind_index_buffer(self.command_buffer, buffer, offset, vk_index_type);
        }
        Ok(())
    }

    fn push_constants(
        &mut self,
        pipeline: &dyn GraphicsPipeline,
        stages: ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) -> Result<()> {
        self.check_recording()?;
        let pipeline = Pipeline::downcast(pipeline)?;

        unsafe {
            self.context.device.cmd_push_constants(
                self.command_buffer,
                pipeline.layout,
                shader_stages_to_vk(stages),
                offset,
                data,
            );
        }
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()> {
        if !self.in_render_pass {
            return Err(Error::BackendError("Draw outside of a render pass".to_string()));
        }

        unsafe {
            self.context.device.cmd_draw_indexed(
                self.command_buffer,
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            );
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for CommandBuffer {
    fn drop(&mut self) {
        unsafe {
            self.context.device.free_command_buffers(self.command_pool, &[self.command_buffer]);
        }
    }
}
