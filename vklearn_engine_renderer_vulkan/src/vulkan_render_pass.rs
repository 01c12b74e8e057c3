/// RenderPass - Vulkan implementation of the RenderPass trait

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::Result;
use vklearn_engine::vklearn::graphics::{
    AttachmentDesc, RenderPass as GraphicsRenderPass, RenderPassDesc,
};
use vklearn_engine::engine_err;

use crate::vulkan::{
    access_flags_to_vk, format_to_vk, image_layout_to_vk, load_op_to_vk, pipeline_stages_to_vk,
    sample_count_to_vk, store_op_to_vk,
};
use crate::vulkan_context::VulkanContext;

/// Vulkan render pass implementation
///
/// Simple wrapper around vk::RenderPass
pub struct RenderPass {
    /// Vulkan render pass handle
    pub(crate) render_pass: vk::RenderPass,
    context: Arc<VulkanContext>,
}

fn attachment_to_vk(attachment: &AttachmentDesc) -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .format(format_to_vk(attachment.format))
        .samples(sample_count_to_vk(attachment.samples))
        .load_op(load_op_to_vk(attachment.load_op))
        .store_op(store_op_to_vk(attachment.store_op))
        .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
        .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
        .initial_layout(image_layout_to_vk(attachment.initial_layout))
        .final_layout(image_layout_to_vk(attachment.final_layout))
}

impl RenderPass {
    pub(crate) fn new(context: Arc<VulkanContext>, desc: &RenderPassDesc) -> Result<Self> {
        let mut attachments: Vec<vk::AttachmentDescription> =
            desc.color_attachments.iter().map(attachment_to_vk).collect();

        let color_attachment_refs: Vec<vk::AttachmentReference> = (0..desc.color_attachments.len() as u32)
            .map(|i| {
                vk::AttachmentReference::default()
                    .attachment(i)
                    .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
            })
            .collect();

        // Depth goes right after the color attachments
        let depth_attachment_ref = desc.depth_attachment.as_ref().map(|depth| {
            let depth_index = attachments.len() as u32;
            attachments.push(attachment_to_vk(depth));
            vk::AttachmentReference::default()
                .attachment(depth_index)
                .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
        });

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachment_refs);
        if let Some(ref depth_ref) = depth_attachment_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let dependencies: Vec<vk::SubpassDependency> = desc
            .dependencies
            .iter()
            .map(|dep| {
                vk::SubpassDependency::default()
                    .src_subpass(dep.src_subpass.unwrap_or(vk::SUBPASS_EXTERNAL))
                    .dst_subpass(dep.dst_subpass)
                    .src_stage_mask(pipeline_stages_to_vk(dep.src_stage))
                    .dst_stage_mask(pipeline_stages_to_vk(dep.dst_stage))
                    .src_access_mask(access_flags_to_vk(dep.src_access))
                    .dst_access_mask(access_flags_to_vk(dep.dst_access))
            })
            .collect();

        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(&dependencies);

        let render_pass = unsafe {
            context.device
                .create_render_pass(&render_pass_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create render pass: {:?}", e))?
        };

        Ok(Self { render_pass, context })
    }

    pub(crate) fn downcast(render_pass: &dyn GraphicsRenderPass) -> Result<vk::RenderPass> {
        render_pass
            .as_any()
            .downcast_ref::<RenderPass>()
            .map(|rp| rp.render_pass)
            .ok_or_else(|| crate::vulkan::foreign_resource("render pass"))
    }
}

impl GraphicsRenderPass for RenderPass {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_render_pass(self.render_pass, None);
        }
    }
}
