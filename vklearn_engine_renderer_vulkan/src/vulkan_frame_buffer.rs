/// Framebuffer - Vulkan implementation of the Framebuffer trait
///
/// Groups one swapchain color view and one depth view. Recreated with the
/// swapchain, reused every frame in between.

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::Result;
use vklearn_engine::vklearn::graphics::{Framebuffer as GraphicsFramebuffer, FramebufferDesc};
use vklearn_engine::engine_err;

use crate::vulkan_context::VulkanContext;
use crate::vulkan_image::ImageView;
use crate::vulkan_render_pass::RenderPass;

/// Vulkan framebuffer implementation
///
/// Wraps a VkFramebuffer. Destroyed when dropped.
pub struct Framebuffer {
    /// Vulkan framebuffer handle
    pub(crate) framebuffer: vk::Framebuffer,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    context: Arc<VulkanContext>,
}

impl Framebuffer {
    pub(crate) fn new(context: Arc<VulkanContext>, desc: &FramebufferDesc<'_>) -> Result<Self> {
        let render_pass = RenderPass::downcast(desc.render_pass)?;
        let attachments = desc
            .attachments
            .iter()
            .map(|view| ImageView::downcast(*view))
            .collect::<Result<Vec<_>>>()?;

        let create_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass)
            .attachments(&attachments)
            .width(desc.width)
            .height(desc.height)
            .layers(1);

        let framebuffer = unsafe {
            context.device
                .create_framebuffer(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create framebuffer: {:?}", e))?
        };

        Ok(Self { framebuffer, width: desc.width, height: desc.height, context })
    }

    pub(crate) fn downcast(framebuffer: &dyn GraphicsFramebuffer) -> Result<vk::Framebuffer> {
        framebuffer
            .as_any()
            .downcast_ref::<Framebuffer>()
            .map(|fb| fb.framebuffer)
            .ok_or_else(|| crate::vulkan::foreign_resource("framebuffer"))
    }
}

impl GraphicsFramebuffer for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}
