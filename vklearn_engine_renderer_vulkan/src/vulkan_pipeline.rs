/// Pipeline and PipelineCache - Vulkan implementations of the pipeline traits
///
/// Shader modules are loaded from SPIR-V files for the duration of the
/// pipeline creation only.

use ash::vk;
use std::any::Any;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::{
    DynamicState, Pipeline as GraphicsPipeline, PipelineCache as GraphicsPipelineCache,
    PipelineDesc, VertexInputRate,
};
use vklearn_engine::{engine_debug, engine_err, engine_error};

use crate::vulkan::{
    buffer_format_to_vk, compare_op_to_vk, cull_mode_to_vk, foreign_resource, front_face_to_vk,
    polygon_mode_to_vk, sample_count_to_vk, shader_stage_to_vk, shader_stages_to_vk, topology_to_vk,
};
use crate::vulkan_context::VulkanContext;
use crate::vulkan_render_pass::RenderPass;

/// Vulkan pipeline implementation
pub struct Pipeline {
    /// Vulkan graphics pipeline
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout (push constants are uploaded through it)
    pub(crate) layout: vk::PipelineLayout,
    context: Arc<VulkanContext>,
}

/// Shader module alive only while the pipeline is being built
struct ShaderModule<'a> {
    module: vk::ShaderModule,
    device: &'a ash::Device,
}

impl<'a> ShaderModule<'a> {
    fn load(device: &'a ash::Device, path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            engine_error!("vklearn::vulkan", "Failed to open shader {}: {}", path.display(), e);
            Error::InitializationFailed(format!("Failed to open shader {}: {}", path.display(), e))
        })?;
        let code = ash::util::read_spv(&mut file).map_err(|e| {
            engine_error!("vklearn::vulkan", "Invalid SPIR-V in {}: {}", path.display(), e);
            Error::InitializationFailed(format!("Invalid SPIR-V in {}: {}", path.display(), e))
        })?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(&code);
        let module = unsafe {
            device
                .create_shader_module(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create shader module: {:?}", e))?
        };

        engine_debug!("vklearn::vulkan", "Loaded shader module {}", path.display());
        Ok(Self { module, device })
    }
}

impl Drop for ShaderModule<'_> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}

fn dynamic_state_to_vk(state: DynamicState) -> vk::DynamicState {
    match state {
        DynamicState::Viewport => vk::DynamicState::VIEWPORT,
        DynamicState::Scissor => vk::DynamicState::SCISSOR,
    }
}

impl Pipeline {
    pub(crate) fn new(context: Arc<VulkanContext>, cache: &PipelineCache, desc: &PipelineDesc<'_>) -> Result<Self> {
        let device = &context.device;
        let render_pass = RenderPass::downcast(desc.render_pass)?;

        let modules = desc
            .shaders
            .iter()
            .map(|shader| ShaderModule::load(device, &shader.spirv_path).map(|module| (shader.stage, module)))
            .collect::<Result<Vec<_>>>()?;

        let shader_stages: Vec<vk::PipelineShaderStageCreateInfo> = modules
            .iter()
            .map(|(stage, module)| {
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(shader_stage_to_vk(*stage))
                    .module(module.module)
                    .name(c"main")
            })
            .collect();

        let vertex_bindings: Vec<vk::VertexInputBindingDescription> = desc.vertex_layout.bindings
            .iter()
            .map(|binding| vk::VertexInputBindingDescription {
                binding: binding.binding,
                stride: binding.stride,
                input_rate: match binding.input_rate {
                    VertexInputRate::Vertex => vk::VertexInputRate::VERTEX,
                    VertexInputRate::Instance => vk::VertexInputRate::INSTANCE,
                },
            })
            .collect();

        let vertex_attributes: Vec<vk::VertexInputAttributeDescription> = desc.vertex_layout.attributes
            .iter()
            .map(|attribute| vk::VertexInputAttributeDescription {
                location: attribute.location,
                binding: attribute.binding,
                format: buffer_format_to_vk(attribute.format),
                offset: attribute.offset,
            })
            .collect();

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_bindings)
            .vertex_attribute_descriptions(&vertex_attributes);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(topology_to_vk(desc.topology))
            .primitive_restart_enable(false);

        // Counts only; both are dynamic
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(1)
            .scissor_count(1);

        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(polygon_mode_to_vk(desc.rasterization.polygon_mode))
            .line_width(desc.rasterization.line_width)
            .cull_mode(cull_mode_to_vk(desc.rasterization.cull_mode))
            .front_face(front_face_to_vk(desc.rasterization.front_face))
            .depth_bias_enable(false);

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(sample_count_to_vk(desc.sample_count));

        let depth_stencil_state = desc.depth.map(|depth| {
            vk::PipelineDepthStencilStateCreateInfo::default()
                .depth_test_enable(depth.test_enable)
                .depth_write_enable(depth.write_enable)
                .depth_compare_op(compare_op_to_vk(depth.compare_op))
                .depth_bounds_test_enable(false)
                .stencil_test_enable(false)
        });

        let color_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState> = (0..desc.color_attachment_count)
            .map(|_| {
                vk::PipelineColorBlendAttachmentState::default()
                    .color_write_mask(vk::ColorComponentFlags::RGBA)
                    .blend_enable(false)
            })
            .collect();
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(&color_blend_attachments);

        let dynamic_states: Vec<vk::DynamicState> =
            desc.dynamic_states.iter().copied().map(dynamic_state_to_vk).collect();
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&dynamic_states);

        let push_constant_ranges: Vec<vk::PushConstantRange> = desc.push_constant_ranges
            .iter()
            .map(|range| vk::PushConstantRange {
                stage_flags: shader_stages_to_vk(range.stages),
                offset: range.offset,
                size: range.size,
            })
            .collect();

        let layout_create_info = vk::PipelineLayoutCreateInfo::default()
            .push_constant_ranges(&push_constant_ranges);

        unsafe {
            let layout = device.create_pipeline_layout(&layout_create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create pipeline layout: {:?}", e))?;

            let mut pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
                .stages(&shader_stages)
                .vertex_input_state(&vertex_input_state)
                .input_assembly_state(&input_assembly_state)
                .viewport_state(&viewport_state)
                .rasterization_state(&rasterization_state)
                .multisample_state(&multisample_state)
                .color_blend_state(&color_blend_state)
                .dynamic_state(&dynamic_state)
                .layout(layout)
                .render_pass(render_pass)
                .subpass(0);
            if let Some(ref depth_stencil_state) = depth_stencil_state {
                pipeline_create_info = pipeline_create_info.depth_stencil_state(depth_stencil_state);
            }

            let pipelines = device
                .create_graphics_pipelines(cache.pipeline_cache, std::slice::from_ref(&pipeline_create_info), None)
                .map_err(|(_, e)| {
                    device.destroy_pipeline_layout(layout, None);
                    engine_err!("vklearn::vulkan", "Failed to create graphics pipeline: {:?}", e)
                })?;

            let Some(&pipeline) = pipelines.first() else {
                device.destroy_pipeline_layout(layout, None);
                return Err(Error::BackendError("Driver returned no pipeline".to_string()));
            };

            drop(modules);
            Ok(Self { pipeline, layout, context })
        }
    }

    pub(crate) fn downcast(pipeline: &dyn GraphicsPipeline) -> Result<&Pipeline> {
        pipeline
            .as_any()
            .downcast_ref::<Pipeline>()
            .ok_or_else(|| foreign_resource("pipeline"))
    }
}

impl GraphicsPipeline for Pipeline {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_pipeline(self.pipeline, None);
            self.context.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}

/// Empty pipeline cache, created once at startup
pub struct PipelineCache {
    pub(crate) pipeline_cache: vk::PipelineCache,
    context: Arc<VulkanContext>,
}

impl PipelineCache {
    pub(crate) fn new(context: Arc<VulkanContext>) -> Result<Self> {
        let create_info = vk::PipelineCacheCreateInfo::default();
        let pipeline_cache = unsafe {
            context.device
                .create_pipeline_cache(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create pipeline cache: {:?}", e))?
        };

        Ok(Self { pipeline_cache, context })
    }

    pub(crate) fn downcast(cache: &dyn GraphicsPipelineCache) -> Result<&PipelineCache> {
        cache
            .as_any()
            .downcast_ref::<PipelineCache>()
            .ok_or_else(|| foreign_resource("pipeline cache"))
    }
}

impl GraphicsPipelineCache for PipelineCache {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for PipelineCache {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_pipeline_cache(self.pipeline_cache, None);
        }
    }
}
