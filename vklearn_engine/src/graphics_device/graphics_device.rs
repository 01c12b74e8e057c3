/// GraphicsDevice trait - factory for every GPU object the renderer owns

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Attachment, Buffer, BufferDesc, CommandPool, Fence, Framebuffer, FramebufferDesc, ImageDesc,
    NativeSwapchain, Pipeline, PipelineCache, PipelineDesc, PresentMode, Queue, RenderPass,
    RenderPassDesc, Semaphore, SurfaceCapabilities, SurfaceFormat, SwapchainDesc,
};

/// Logical device bound to one presentation surface
///
/// Implemented by backends (e.g. `VulkanGraphicsDevice`). Objects created
/// here must be dropped before the device itself; backends keep the native
/// device alive until the last child is gone.
pub trait GraphicsDevice: Send + Sync {
    /// Current capabilities of the presentation surface
    fn surface_capabilities(&self) -> Result<SurfaceCapabilities>;

    /// Formats supported by the presentation surface, in driver order
    fn surface_formats(&self) -> Result<Vec<SurfaceFormat>>;

    /// Present modes supported by the presentation surface
    fn surface_present_modes(&self) -> Result<Vec<PresentMode>>;

    /// Build a native swapchain and one image view per presentable image
    ///
    /// The previous swapchain for the same surface must already be dropped.
    fn create_native_swapchain(&self, desc: &SwapchainDesc) -> Result<Box<dyn NativeSwapchain>>;

    /// Create a binary semaphore
    fn create_semaphore(&self) -> Result<Box<dyn Semaphore>>;

    /// Create a fence, optionally already signaled
    fn create_fence(&self, signaled: bool) -> Result<Box<dyn Fence>>;

    /// Create a command pool on the graphics queue family
    ///
    /// Buffers allocated from it can be reset individually.
    fn create_command_pool(&self) -> Result<Arc<dyn CommandPool>>;

    /// Create an empty pipeline cache
    fn create_pipeline_cache(&self) -> Result<Arc<dyn PipelineCache>>;

    /// Create an image with its memory and a view covering it
    fn create_attachment(&self, desc: &ImageDesc) -> Result<Box<dyn Attachment>>;

    /// Create a render pass
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer
    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Box<dyn Framebuffer>>;

    /// Create a graphics pipeline
    fn create_pipeline(&self, cache: &dyn PipelineCache, desc: &PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create a host-visible buffer
    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Queue used for command submission
    fn graphics_queue(&self) -> Arc<dyn Queue>;

    /// Queue used for presentation (may be the graphics queue)
    fn present_queue(&self) -> Arc<dyn Queue>;

    /// Block until the device is idle
    fn wait_idle(&self) -> Result<()>;
}
