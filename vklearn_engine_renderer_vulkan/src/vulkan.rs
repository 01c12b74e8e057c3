/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait
///
/// Owns the instance, surface, logical device and allocator through a
/// shared `VulkanContext`, and converts engine descriptors to `ash` types.

use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::CStr;
use std::sync::Arc;
use vklearn_engine::vklearn::{EngineConfig, Error, Result};
use vklearn_engine::vklearn::graphics::{
    AccessFlags, Attachment as GraphicsAttachment, Buffer as GraphicsBuffer, BufferDesc, BufferFormat,
    ColorSpace, CommandPool as GraphicsCommandPool, CompareOp, CullMode, Extent2D,
    Fence as GraphicsFence, Framebuffer as GraphicsFramebuffer, FramebufferDesc, FrontFace,
    GraphicsDevice, ImageDesc, ImageLayout, LoadOp, NativeSwapchain, Pipeline as GraphicsPipeline,
    PipelineCache as GraphicsPipelineCache, PipelineDesc, PipelineStageFlags, PolygonMode,
    PresentMode, PrimitiveTopology, Queue as GraphicsQueue, Rect2D, RenderPass as GraphicsRenderPass,
    RenderPassDesc, Semaphore as GraphicsSemaphore, ShaderStage, ShaderStageFlags, StoreOp,
    SurfaceCapabilities, SurfaceFormat, SwapchainDesc, TextureFormat,
};
use vklearn_engine::{engine_debug, engine_err, engine_error, engine_info, engine_warn};

use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_buffer::CommandPool;
use crate::vulkan_context::VulkanContext;
use crate::vulkan_debug;
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_image::Attachment;
use crate::vulkan_physical_device;
use crate::vulkan_pipeline::{Pipeline, PipelineCache};
use crate::vulkan_queue::Queue;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_swapchain::Swapchain;
use crate::vulkan_sync::{Fence, Semaphore};

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Vulkan device implementation
///
/// Central object for creating GPU resources. Every resource keeps the
/// context alive, so the device may be dropped before them.
pub struct VulkanGraphicsDevice {
    graphics_queue: Arc<Queue>,
    /// Same `Arc` as `graphics_queue` when the families coincide
    present_queue: Arc<Queue>,
    device_name: String,
    context: Arc<VulkanContext>,
}

impl VulkanGraphicsDevice {
    /// Create instance, surface, device and allocator for `window`
    ///
    /// # Arguments
    ///
    /// * `window` - Window providing display and window handles
    /// * `config` - Validation flag and preferred physical device name
    pub fn new<W: HasDisplayHandle + HasWindowHandle>(window: &W, config: &EngineConfig) -> Result<Self> {
        unsafe {
            // Create Vulkan Entry
            let entry = ash::Entry::load()
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to load Vulkan library: {:?}", e);
                    Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
                })?;

            // Application Info
            let app_info = vk::ApplicationInfo::default()
                .application_name(c"vklearn Application")
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"vklearn")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_3);

            // Get required extensions
            let display_handle = window.display_handle()
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to get display handle: {}", e);
                    Error::InitializationFailed(format!("Failed to get display handle: {}", e))
                })?;
            let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to get required extensions: {}", e);
                    Error::InitializationFailed(format!("Failed to get required extensions: {}", e))
                })?
                .to_vec();

            let validate = config.validate && Self::validation_layer_available(&entry);
            if validate {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            }

            // Validation layers
            let layer_names = if validate {
                vec![VALIDATION_LAYER.as_ptr()]
            } else {
                vec![]
            };

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry
                .create_instance(&create_info, None)
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to create Vulkan instance: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
                })?;

            // Setup debug messenger if validation is enabled
            let debug_utils = if validate {
                let debug_utils = ash::ext::debug_utils::Instance::new(&entry, &instance);
                let messenger = debug_utils
                    .create_debug_utils_messenger(&vulkan_debug::messenger_create_info(), None)
                    .map_err(|e| {
                        engine_error!("vklearn::vulkan", "Failed to create debug messenger: {:?}", e);
                        Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
                    })?;
                engine_debug!("vklearn::vulkan", "Validation enabled");
                Some((debug_utils, messenger))
            } else {
                None
            };

            // Create Surface
            let window_handle = window.window_handle()
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to get window handle: {}", e);
                    Error::InitializationFailed(format!("Failed to get window handle: {}", e))
                })?;
            let surface = ash_window::create_surface(
                &entry,
                &instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )
            .map_err(|e| {
                engine_error!("vklearn::vulkan", "Failed to create surface: {:?}", e);
                Error::InitializationFailed(format!("Failed to create surface: {:?}", e))
            })?;

            let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

            // Pick Physical Device and queue families
            let selected = vulkan_physical_device::pick(
                &instance,
                &surface_loader,
                surface,
                config.preferred_device_name(),
            )?;

            // Create Logical Device
            let queue_priorities = [1.0];
            let queue_create_infos = if selected.graphics_family == selected.present_family {
                vec![
                    vk::DeviceQueueCreateInfo::default()
                        .queue_family_index(selected.graphics_family)
                        .queue_priorities(&queue_priorities),
                ]
            } else {
                vec![
                    vk::DeviceQueueCreateInfo::default()
                        .queue_family_index(selected.graphics_family)
                        .queue_priorities(&queue_priorities),
                    vk::DeviceQueueCreateInfo::default()
                        .queue_family_index(selected.present_family)
                        .queue_priorities(&queue_priorities),
                ]
            };

            let device_extension_names = [ash::khr::swapchain::NAME.as_ptr()];
            let device_features = vk::PhysicalDeviceFeatures::default();

            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos)
                .enabled_extension_names(&device_extension_names)
                .enabled_features(&device_features);

            let device = instance
                .create_device(selected.physical_device, &device_create_info, None)
                .map_err(|e| {
                    engine_error!("vklearn::vulkan", "Failed to create logical device: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                })?;

            // Create GPU allocator
            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device: selected.physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                engine_error!("vklearn::vulkan", "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            let context = Arc::new(VulkanContext::new(
                entry,
                instance,
                selected.physical_device,
                device,
                allocator,
                surface_loader,
                surface,
                selected.graphics_family,
                selected.present_family,
                debug_utils,
            ));

            let graphics_queue = Arc::new(Queue::new(Arc::clone(&context), selected.graphics_family));
            let present_queue = if selected.present_family == selected.graphics_family {
                Arc::clone(&graphics_queue)
            } else {
                Arc::new(Queue::new(Arc::clone(&context), selected.present_family))
            };

            engine_info!("vklearn::vulkan", "Vulkan device ready on [{}]", selected.name);

            Ok(Self {
                graphics_queue,
                present_queue,
                device_name: selected.name,
                context,
            })
        }
    }

    fn validation_layer_available(entry: &ash::Entry) -> bool {
        validation_layer_listed(unsafe { entry.enumerate_instance_layer_properties() })
    }

    /// Name of the selected physical device
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn surface_capabilities(&self) -> Result<SurfaceCapabilities> {
        let ctx = &self.context;
        let capabilities = unsafe {
            ctx.surface_loader
                .get_physical_device_surface_capabilities(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to get surface capabilities: {:?}", e))?
        };
        Ok(capabilities_from_vk(&capabilities))
    }

    fn surface_formats(&self) -> Result<Vec<SurfaceFormat>> {
        let ctx = &self.context;
        let formats = unsafe {
            ctx.surface_loader
                .get_physical_device_surface_formats(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to get surface formats: {:?}", e))?
        };
        Ok(formats
            .iter()
            .map(|f| SurfaceFormat {
                format: format_from_vk(f.format),
                color_space: color_space_from_vk(f.color_space),
            })
            .collect())
    }

    fn surface_present_modes(&self) -> Result<Vec<PresentMode>> {
        let ctx = &self.context;
        let modes = unsafe {
            ctx.surface_loader
                .get_physical_device_surface_present_modes(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to get present modes: {:?}", e))?
        };
        Ok(modes.into_iter().filter_map(present_mode_from_vk).collect())
    }

    fn create_native_swapchain(&self, desc: &SwapchainDesc) -> Result<Box<dyn NativeSwapchain>> {
        Ok(Box::new(Swapchain::new(Arc::clone(&self.context), desc)?))
    }

    fn create_semaphore(&self) -> Result<Box<dyn GraphicsSemaphore>> {
        Ok(Box::new(Semaphore::new(Arc::clone(&self.context))?))
    }

    fn create_fence(&self, signaled: bool) -> Result<Box<dyn GraphicsFence>> {
        Ok(Box::new(Fence::new(Arc::clone(&self.context), signaled)?))
    }

    fn create_command_pool(&self) -> Result<Arc<dyn GraphicsCommandPool>> {
        Ok(CommandPool::new(Arc::clone(&self.context))?)
    }

    fn create_pipeline_cache(&self) -> Result<Arc<dyn GraphicsPipelineCache>> {
        Ok(Arc::new(PipelineCache::new(Arc::clone(&self.context))?))
    }

    fn create_attachment(&self, desc: &ImageDesc) -> Result<Box<dyn GraphicsAttachment>> {
        Ok(Box::new(Attachment::new(Arc::clone(&self.context), desc)?))
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn GraphicsRenderPass>> {
        Ok(Arc::new(RenderPass::new(Arc::clone(&self.context), desc)?))
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Box<dyn GraphicsFramebuffer>> {
        Ok(Box::new(Framebuffer::new(Arc::clone(&self.context), desc)?))
    }

    fn create_pipeline(&self, cache: &dyn GraphicsPipelineCache, desc: &PipelineDesc) -> Result<Arc<dyn GraphicsPipeline>> {
        let cache = PipelineCache::downcast(cache)?;
        Ok(Arc::new(Pipeline::new(Arc::clone(&self.context), cache, desc)?))
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn GraphicsBuffer>> {
        Ok(Arc::new(Buffer::new(Arc::clone(&self.context), desc)?))
    }

    fn graphics_queue(&self) -> Arc<dyn GraphicsQueue> {
        self.graphics_queue.clone()
    }

    fn present_queue(&self) -> Arc<dyn GraphicsQueue> {
        self.present_queue.clone()
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.context.device
                .device_wait_idle()
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to wait for device idle: {:?}", e))
        }
    }
}

// ===== CONVERSIONS =====

/// Error for a trait object that was not created by this backend
pub(crate) fn foreign_resource(kind: &str) -> Error {
    engine_error!("vklearn::vulkan", "Foreign {} handed to the Vulkan backend", kind);
    Error::InvalidResource(format!("{} was not created by the Vulkan backend", kind))
}

/// Convert TextureFormat to Vulkan format
pub(crate) fn format_to_vk(format: TextureFormat) -> vk::Format {
    match format {
        TextureFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        TextureFormat::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        TextureFormat::D32_SFLOAT => vk::Format::D32_SFLOAT,
        TextureFormat::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
        TextureFormat::D32_SFLOAT_S8_UINT => vk::Format::D32_SFLOAT_S8_UINT,
        TextureFormat::Other(raw) => vk::Format::from_raw(raw),
    }
}

/// Convert Vulkan format to TextureFormat, keeping unknown values raw
pub(crate) fn format_from_vk(format: vk::Format) -> TextureFormat {
    match format {
        vk::Format::R8G8B8A8_UNORM => TextureFormat::R8G8B8A8_UNORM,
        vk::Format::R8G8B8A8_SRGB => TextureFormat::R8G8B8A8_SRGB,
        vk::Format::B8G8R8A8_UNORM => TextureFormat::B8G8R8A8_UNORM,
        vk::Format::B8G8R8A8_SRGB => TextureFormat::B8G8R8A8_SRGB,
        vk::Format::D32_SFLOAT => TextureFormat::D32_SFLOAT,
        vk::Format::D24_UNORM_S8_UINT => TextureFormat::D24_UNORM_S8_UINT,
        vk::Format::D32_SFLOAT_S8_UINT => TextureFormat::D32_SFLOAT_S8_UINT,
        other => TextureFormat::Other(other.as_raw()),
    }
}

pub(crate) fn color_space_to_vk(color_space: ColorSpace) -> vk::ColorSpaceKHR {
    match color_space {
        ColorSpace::SrgbNonLinear => vk::ColorSpaceKHR::SRGB_NONLINEAR,
        ColorSpace::Other(raw) => vk::ColorSpaceKHR::from_raw(raw),
    }
}

pub(crate) fn color_space_from_vk(color_space: vk::ColorSpaceKHR) -> ColorSpace {
    match color_space {
        vk::ColorSpaceKHR::SRGB_NONLINEAR => ColorSpace::SrgbNonLinear,
        other => ColorSpace::Other(other.as_raw()),
    }
}

pub(crate) fn present_mode_to_vk(mode: PresentMode) -> vk::PresentModeKHR {
    match mode {
        PresentMode::Immediate => vk::PresentModeKHR::IMMEDIATE,
        PresentMode::Mailbox => vk::PresentModeKHR::MAILBOX,
        PresentMode::Fifo => vk::PresentModeKHR::FIFO,
        PresentMode::FifoRelaxed => vk::PresentModeKHR::FIFO_RELAXED,
    }
}

/// Modes the engine cannot select (shared refresh, ...) are dropped
pub(crate) fn present_mode_from_vk(mode: vk::PresentModeKHR) -> Option<PresentMode> {
    match mode {
        vk::PresentModeKHR::IMMEDIATE => Some(PresentMode::Immediate),
        vk::PresentModeKHR::MAILBOX => Some(PresentMode::Mailbox),
        vk::PresentModeKHR::FIFO => Some(PresentMode::Fifo),
        vk::PresentModeKHR::FIFO_RELAXED => Some(PresentMode::FifoRelaxed),
        _ => None,
    }
}

pub(crate) fn extent_from_vk(extent: vk::Extent2D) -> Extent2D {
    Extent2D::new(extent.width, extent.height)
}

/// `0xFFFFFFFF` current extent maps onto `SurfaceCapabilities::UNDEFINED_EXTENT`
pub(crate) fn capabilities_from_vk(capabilities: &vk::SurfaceCapabilitiesKHR) -> SurfaceCapabilities {
    SurfaceCapabilities {
        min_image_count: capabilities.min_image_count,
        max_image_count: capabilities.max_image_count,
        current_extent: extent_from_vk(capabilities.current_extent),
        min_image_extent: extent_from_vk(capabilities.min_image_extent),
        max_image_extent: extent_from_vk(capabilities.max_image_extent),
    }
}

pub(crate) fn rect_to_vk(rect: Rect2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: rect.x, y: rect.y },
        extent: vk::Extent2D { width: rect.width, height: rect.height },
    }
}

/// Convert BufferFormat to Vulkan format (vertex attributes)
pub(crate) fn buffer_format_to_vk(format: BufferFormat) -> vk::Format {
    match format {
        BufferFormat::R32_SFLOAT => vk::Format::R32_SFLOAT,
        BufferFormat::R32G32_SFLOAT => vk::Format::R32G32_SFLOAT,
        BufferFormat::R32G32B32_SFLOAT => vk::Format::R32G32B32_SFLOAT,
        BufferFormat::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
    }
}

pub(crate) fn shader_stage_to_vk(stage: ShaderStage) -> vk::ShaderStageFlags {
    match stage {
        ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
        ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
    }
}

pub(crate) fn shader_stages_to_vk(stages: ShaderStageFlags) -> vk::ShaderStageFlags {
    let mut flags = vk::ShaderStageFlags::empty();
    if stages.contains(ShaderStageFlags::VERTEX) {
        flags |= vk::ShaderStageFlags::VERTEX;
    }
    if stages.contains(ShaderStageFlags::FRAGMENT) {
        flags |= vk::ShaderStageFlags::FRAGMENT;
    }
    flags
}

pub(crate) fn pipeline_stages_to_vk(stages: PipelineStageFlags) -> vk::PipelineStageFlags {
    const MAPPING: [(PipelineStageFlags, vk::PipelineStageFlags); 9] = [
        (PipelineStageFlags::TOP_OF_PIPE, vk::PipelineStageFlags::TOP_OF_PIPE),
        (PipelineStageFlags::VERTEX_INPUT, vk::PipelineStageFlags::VERTEX_INPUT),
        (PipelineStageFlags::VERTEX_SHADER, vk::PipelineStageFlags::VERTEX_SHADER),
        (PipelineStageFlags::EARLY_FRAGMENT_TESTS, vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS),
        (PipelineStageFlags::FRAGMENT_SHADER, vk::PipelineStageFlags::FRAGMENT_SHADER),
        (PipelineStageFlags::LATE_FRAGMENT_TESTS, vk::PipelineStageFlags::LATE_FRAGMENT_TESTS),
        (PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT),
        (PipelineStageFlags::TRANSFER, vk::PipelineStageFlags::TRANSFER),
        (PipelineStageFlags::BOTTOM_OF_PIPE, vk::PipelineStageFlags::BOTTOM_OF_PIPE),
    ];
    MAPPING
        .iter()
        .filter(|(engine, _)| stages.contains(*engine))
        .fold(vk::PipelineStageFlags::empty(), |acc, (_, native)| acc | *native)
}

pub(crate) fn access_flags_to_vk(access: AccessFlags) -> vk::AccessFlags {
    const MAPPING: [(AccessFlags, vk::AccessFlags); 4] = [
        (AccessFlags::COLOR_ATTACHMENT_READ, vk::AccessFlags::COLOR_ATTACHMENT_READ),
        (AccessFlags::COLOR_ATTACHMENT_WRITE, vk::AccessFlags::COLOR_ATTACHMENT_WRITE),
        (AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ, vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ),
        (AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE, vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE),
    ];
    MAPPING
        .iter()
        .filter(|(engine, _)| access.contains(*engine))
        .fold(vk::AccessFlags::empty(), |acc, (_, native)| acc | *native)
}

pub(crate) fn load_op_to_vk(load_op: LoadOp) -> vk::AttachmentLoadOp {
    match load_op {
        LoadOp::Load => vk::AttachmentLoadOp::LOAD,
        LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
    }
}

pub(crate) fn store_op_to_vk(store_op: StoreOp) -> vk::AttachmentStoreOp {
    match store_op {
        StoreOp::Store => vk::AttachmentStoreOp::STORE,
        StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
    }
}

pub(crate) fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
        ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
    }
}

/// Unsupported counts fall back to 1 sample
pub(crate) fn sample_count_to_vk(samples: u32) -> vk::SampleCountFlags {
    match samples {
        2 => vk::SampleCountFlags::TYPE_2,
        4 => vk::SampleCountFlags::TYPE_4,
        8 => vk::SampleCountFlags::TYPE_8,
        16 => vk::SampleCountFlags::TYPE_16,
        _ => vk::SampleCountFlags::TYPE_1,
    }
}

pub(crate) fn topology_to_vk(topology: PrimitiveTopology) -> vk::PrimitiveTopology {
    match topology {
        PrimitiveTopology::TriangleList => vk::PrimitiveTopology::TRIANGLE_LIST,
        PrimitiveTopology::TriangleStrip => vk::PrimitiveTopology::TRIANGLE_STRIP,
        PrimitiveTopology::LineList => vk::PrimitiveTopology::LINE_LIST,
    }
}

pub(crate) fn cull_mode_to_vk(mode: CullMode) -> vk::CullModeFlags {
    match mode {
        CullMode::None => vk::CullModeFlags::NONE,
        CullMode::Front => vk::CullModeFlags::FRONT,
        CullMode::Back => vk::CullModeFlags::BACK,
    }
}

pub(crate) fn front_face_to_vk(face: FrontFace) -> vk::FrontFace {
    match face {
        FrontFace::CounterClockwise => vk::FrontFace::COUNTER_CLOCKWISE,
        FrontFace::Clockwise => vk::FrontFace::CLOCKWISE,
    }
}

pub(crate) fn polygon_mode_to_vk(mode: PolygonMode) -> vk::PolygonMode {
    match mode {
        PolygonMode::Fill => vk::PolygonMode::FILL,
        PolygonMode::Line => vk::PolygonMode::LINE,
    }
}

pub(crate) fn compare_op_to_vk(op: CompareOp) -> vk::CompareOp {
    match op {
        CompareOp::Never => vk::CompareOp::NEVER,
        CompareOp::Less => vk::CompareOp::LESS,
        CompareOp::Equal => vk::CompareOp::EQUAL,
        CompareOp::LessOrEqual => vk::CompareOp::LESS_OR_EQUAL,
        CompareOp::Greater => vk::CompareOp::GREATER,
        CompareOp::Always => vk::CompareOp::ALWAYS,
    }
}

/// Whether the enumerated instance layers include the validation layer
///
/// An enumeration failure is logged and treated as "not installed".
pub(crate) fn validation_layer_listed(
    layers: std::result::Result<Vec<vk::LayerProperties>, vk::Result>,
) -> bool {
    let layers = match layers {
        Ok(layers) => layers,
        Err(e) => {
            engine_warn!("vklearn::vulkan", "Could not enumerate instance layers: {:?}", e);
            Vec::new()
        }
    };
    let available = layers.iter().any(|layer| {
        layer.layer_name_as_c_str().is_ok_and(|name| name == VALIDATION_LAYER)
    });
    if !available {
        engine_warn!("vklearn::vulkan", "Validation requested but {:?} is not installed", VALIDATION_LAYER);
    }
    available
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
