/// ForwardRenderActivity - one render pass, one pipeline, per-image frame slots
///
/// Every swapchain image owns a command buffer, a fence, a depth attachment
/// and a framebuffer, all indexed by the swapchain's `current_frame`. The
/// slot fence is created signaled and is the only thing that tells a later
/// recording that the GPU is done with the slot's command buffer.

use std::sync::Arc;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graphics_device::{
    AccessFlags, Attachment, AttachmentDesc, ClearValue, CommandBuffer, CommandBufferLevel,
    CommandPool, CompareOp, CullMode, DepthState, DynamicState, Extent2D, Fence, Framebuffer,
    FramebufferDesc, FrontFace, GraphicsDevice, ImageDesc, ImageLayout, ImageUsage, IndexType,
    LoadOp, Pipeline, PipelineCache, PipelineDesc, PipelineStageFlags, PolygonMode,
    PrimitiveTopology, Queue, RasterizationState, Rect2D, RenderPass, RenderPassDesc,
    ShaderModuleDesc, StoreOp, SubmitInfo, SubpassDependency, TextureFormat, Viewport,
};
use crate::renderer::model::GpuModel;
use crate::renderer::push_constants::EntityPushConstants;
use crate::renderer::shader_compiler::{ForwardShaders, ShaderCompiler};
use crate::renderer::swap_chain::SwapChain;
use crate::renderer::vertex::forward_vertex_layout;
use crate::scene::Scene;
use crate::engine_debug;

pub const CLEAR_COLOR: [f32; 4] = [0.5, 0.7, 0.9, 1.0];
pub const CLEAR_DEPTH: f32 = 1.0;
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::D32_SFLOAT;

pub struct ForwardRenderActivity {
    // Field order is drop order: pipeline, per-slot state, then the render pass
    pipeline: Arc<dyn Pipeline>,
    frame_buffers: Vec<Box<dyn Framebuffer>>,
    depth_attachments: Vec<Box<dyn Attachment>>,
    command_buffers: Vec<Box<dyn CommandBuffer>>,
    fences: Vec<Box<dyn Fence>>,
    render_pass: Arc<dyn RenderPass>,

    device: Arc<dyn GraphicsDevice>,
    command_pool: Arc<dyn CommandPool>,
    pipeline_cache: Arc<dyn PipelineCache>,
    shader_modules: Vec<ShaderModuleDesc>,
    color_format: TextureFormat,
    extent: Extent2D,
}

impl ForwardRenderActivity {
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        swap_chain: &SwapChain,
        command_pool: Arc<dyn CommandPool>,
        pipeline_cache: Arc<dyn PipelineCache>,
        shaders: &ForwardShaders,
        config: &EngineConfig,
        compiler: Option<&dyn ShaderCompiler>,
    ) -> Result<Self> {
        let color_format = swap_chain.surface_format().format;
        let extent = swap_chain.extent();
        let shader_modules = shaders.modules(config, compiler)?;

        let render_pass = device.create_render_pass(&forward_render_pass_desc(color_format))?;
        let pipeline = device.create_pipeline(
            pipeline_cache.as_ref(),
            &forward_pipeline_desc(render_pass.as_ref(), &shader_modules),
        )?;
        let depth_attachments = create_depth_attachments(device.as_ref(), swap_chain)?;
        let frame_buffers =
            create_frame_buffers(device.as_ref(), swap_chain, render_pass.as_ref(), &depth_attachments)?;
        let (command_buffers, fences) =
            create_frame_slots(device.as_ref(), command_pool.as_ref(), swap_chain.image_count())?;

        engine_debug!(
            "vklearn::ForwardRenderActivity",
            "Created forward activity: {} slot(s), {}x{}",
            swap_chain.image_count(),
            extent.width,
            extent.height
        );

        Ok(Self {
            pipeline,
            frame_buffers,
            depth_attachments,
            command_buffers,
            fences,
            render_pass,
            device,
            command_pool,
            pipeline_cache,
            shader_modules,
            color_format,
            extent,
        })
    }

    /// Record the draw commands of the current frame slot
    ///
    /// Waits for the slot's previous submission before touching its
    /// command buffer.
    pub fn record_command_buffer(
        &mut self,
        swap_chain: &SwapChain,
        models: &[GpuModel],
        scene: &Scene,
    ) -> Result<()> {
        let index = self.slot_index(swap_chain)?;
        let fence = &self.fences[index];
        fence.wait()?;
        fence.reset()?;

        let extent = self.extent;
        let cmd = &mut self.command_buffers[index];
        cmd.reset()?;
        cmd.begin()?;

        let full_area = Rect2D { x: 0, y: 0, width: extent.width, height: extent.height };
        cmd.begin_render_pass(
            self.render_pass.as_ref(),
            self.frame_buffers[index].as_ref(),
            full_area,
            &[
                ClearValue::Color(CLEAR_COLOR),
                ClearValue::DepthStencil { depth: CLEAR_DEPTH, stencil: 0 },
            ],
        )?;
        cmd.bind_pipeline(self.pipeline.as_ref())?;

        // negative height flips Y so +Y points up in clip space
        cmd.set_viewport(Viewport {
            x: 0.0,
            y: extent.height as f32,
            width: extent.width as f32,
            height: -(extent.height as f32),
            min_depth: 0.0,
            max_depth: 1.0,
        })?;
        cmd.set_scissor(full_area)?;

        let projection = scene.projection().matrix();
        for model in models {
            if scene.entity_count_for_model(model.model_id()) == 0 {
                continue;
            }
            for mesh in model.meshes() {
                cmd.bind_vertex_buffer(mesh.vertex_buffer(), 0)?;
                cmd.bind_index_buffer(mesh.index_buffer(), 0, IndexType::U32)?;
                for entity in scene.entities_by_model_id(model.model_id()) {
                    let constants = EntityPushConstants::new(projection, entity.model_matrix());
                    let range = EntityPushConstants::range();
                    cmd.push_constants(self.pipeline.as_ref(), range.stages, range.offset, constants.as_bytes())?;
                    cmd.draw_indexed(mesh.index_count(), 1, 0, 0, 0)?;
                }
            }
        }

        cmd.end_render_pass()?;
        cmd.end()
    }

    /// Submit the current slot: wait for its image, signal render-complete and the slot fence
    pub fn submit(&self, swap_chain: &SwapChain, queue: &dyn Queue) -> Result<()> {
        let index = self.slot_index(swap_chain)?;
        let semaphores = swap_chain.sync_semaphores();
        queue.submit(&SubmitInfo {
            command_buffer: self.command_buffers[index].as_ref(),
            wait_semaphore: Some((
                semaphores.img_acquisition.as_ref(),
                PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            )),
            signal_semaphore: Some(semaphores.render_complete.as_ref()),
            fence: Some(self.fences[index].as_ref()),
        })
    }

    /// Rebuild everything that depends on the swapchain images
    ///
    /// The device must be idle. Command buffers and fences survive unless
    /// the image count changed.
    pub fn resize(&mut self, swap_chain: &SwapChain) -> Result<()> {
        self.release_swapchain_resources();

        let color_format = swap_chain.surface_format().format;
        if color_format != self.color_format {
            engine_debug!(
                "vklearn::ForwardRenderActivity",
                "Surface format changed {:?} -> {:?}, rebuilding render pass",
                self.color_format,
                color_format
            );
            self.render_pass = self.device.create_render_pass(&forward_render_pass_desc(color_format))?;
            self.pipeline = self.device.create_pipeline(
                self.pipeline_cache.as_ref(),
                &forward_pipeline_desc(self.render_pass.as_ref(), &self.shader_modules),
            )?;
            self.color_format = color_format;
        }

        if swap_chain.image_count() != self.command_buffers.len() {
            self.command_buffers.clear();
            self.fences.clear();
            let (command_buffers, fences) =
                create_frame_slots(self.device.as_ref(), self.command_pool.as_ref(), swap_chain.image_count())?;
            self.command_buffers = command_buffers;
            self.fences = fences;
        }

        self.depth_attachments = create_depth_attachments(self.device.as_ref(), swap_chain)?;
        self.frame_buffers = create_frame_buffers(
            self.device.as_ref(),
            swap_chain,
            self.render_pass.as_ref(),
            &self.depth_attachments,
        )?;
        self.extent = swap_chain.extent();
        Ok(())
    }

    /// Drop the framebuffers, then the depth attachments
    ///
    /// Both refer to swapchain image views, so this must run before the
    /// old swapchain is destroyed.
    pub fn release_swapchain_resources(&mut self) {
        self.frame_buffers.clear();
        self.depth_attachments.clear();
    }

    /// Pool the slot command buffers come from, on the graphics family
    pub fn command_pool(&self) -> &dyn CommandPool {
        self.command_pool.as_ref()
    }

    pub fn slot_count(&self) -> usize {
        self.command_buffers.len()
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    fn slot_index(&self, swap_chain: &SwapChain) -> Result<usize> {
        let index = swap_chain.current_frame();
        if index >= self.command_buffers.len() || index >= self.frame_buffers.len() {
            return Err(Error::InvalidResource(format!(
                "frame {} outside the {} forward slot(s)",
                index,
                self.command_buffers.len()
            )));
        }
        Ok(index)
    }
}

// ===== DESCRIPTORS =====

/// One color attachment presented at the end, one transient depth attachment
pub fn forward_render_pass_desc(color_format: TextureFormat) -> RenderPassDesc {
    RenderPassDesc {
        color_attachments: vec![AttachmentDesc {
            format: color_format,
            samples: 1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            initial_layout: ImageLayout::Undefined,
            final_layout: ImageLayout::PresentSrc,
        }],
        depth_attachment: Some(AttachmentDesc {
            format: DEPTH_FORMAT,
            samples: 1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::DontCare,
            initial_layout: ImageLayout::Undefined,
            final_layout: ImageLayout::DepthStencilAttachment,
        }),
        dependencies: vec![SubpassDependency {
            src_subpass: None,
            dst_subpass: 0,
            src_stage: PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            dst_stage: PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            src_access: AccessFlags::empty(),
            dst_access: AccessFlags::COLOR_ATTACHMENT_WRITE,
        }],
    }
}

pub fn forward_pipeline_desc<'a>(
    render_pass: &'a dyn RenderPass,
    shader_modules: &[ShaderModuleDesc],
) -> PipelineDesc<'a> {
    PipelineDesc {
        render_pass,
        shaders: shader_modules.to_vec(),
        vertex_layout: forward_vertex_layout(),
        topology: PrimitiveTopology::TriangleList,
        rasterization: RasterizationState {
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::Clockwise,
            line_width: 1.0,
        },
        sample_count: 1,
        color_attachment_count: 1,
        depth: Some(DepthState {
            test_enable: true,
            write_enable: true,
            compare_op: CompareOp::LessOrEqual,
        }),
        push_constant_ranges: vec![EntityPushConstants::range()],
        dynamic_states: vec![DynamicState::Viewport, DynamicState::Scissor],
    }
}

// ===== PER-SLOT STATE =====

fn create_depth_attachments(device: &dyn GraphicsDevice, swap_chain: &SwapChain) -> Result<Vec<Box<dyn Attachment>>> {
    let desc = ImageDesc {
        extent: swap_chain.extent(),
        format: DEPTH_FORMAT,
        usage: ImageUsage::DepthStencilAttachment,
    };
    (0..swap_chain.image_count()).map(|_| device.create_attachment(&desc)).collect()
}

fn create_frame_buffers(
    device: &dyn GraphicsDevice,
    swap_chain: &SwapChain,
    render_pass: &dyn RenderPass,
    depth_attachments: &[Box<dyn Attachment>],
) -> Result<Vec<Box<dyn Framebuffer>>> {
    let extent = swap_chain.extent();
    depth_attachments
        .iter()
        .enumerate()
        .map(|(index, depth)| {
            let color = swap_chain.image_view(index).ok_or_else(|| {
                Error::InvalidResource(format!("swapchain has no image view {}", index))
            })?;
            device.create_framebuffer(&FramebufferDesc {
                render_pass,
                attachments: vec![color, depth.image_view()],
                width: extent.width,
                height: extent.height,
            })
        })
        .collect()
}

type FrameSlots = (Vec<Box<dyn CommandBuffer>>, Vec<Box<dyn Fence>>);

fn create_frame_slots(device: &dyn GraphicsDevice, command_pool: &dyn CommandPool, count: usize) -> Result<FrameSlots> {
    let mut command_buffers = Vec::with_capacity(count);
    let mut fences = Vec::with_capacity(count);
    for _ in 0..count {
        command_buffers.push(command_pool.allocate_command_buffer(CommandBufferLevel::Primary)?);
        fences.push(device.create_fence(true)?);
    }
    Ok((command_buffers, fences))
}

#[cfg(test)]
#[path = "forward_render_activity_tests.rs"]
mod tests;
