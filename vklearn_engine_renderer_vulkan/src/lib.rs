/*!
# vklearn engine - Vulkan backend

Vulkan implementation of the `vklearn_engine` graphics-device traits, using
`ash` for the bindings and `gpu-allocator` for memory management.

```no_run
use std::sync::Arc;
use vklearn_engine::vklearn::EngineConfig;
use vklearn_engine::vklearn::graphics::GraphicsDevice;
use vklearn_engine_renderer_vulkan::VulkanGraphicsDevice;

# fn demo(window: &winit::window::Window) -> vklearn_engine::vklearn::Result<()> {
let config = EngineConfig::default();
let device: Arc<dyn GraphicsDevice> = Arc::new(VulkanGraphicsDevice::new(window, &config)?);
# Ok(())
# }
```

With the `shader-recompile` feature, `ShadercCompiler` compiles GLSL
sources at startup when `shader_recompilation` is set.
*/

mod vulkan;
mod vulkan_context;
mod vulkan_debug;
mod vulkan_physical_device;
mod vulkan_queue;
mod vulkan_sync;
mod vulkan_swapchain;
mod vulkan_image;
mod vulkan_buffer;
mod vulkan_command_buffer;
mod vulkan_render_pass;
mod vulkan_frame_buffer;
mod vulkan_pipeline;
#[cfg(feature = "shader-recompile")]
mod vulkan_shader_compiler;

pub use vulkan::VulkanGraphicsDevice;
pub use vulkan_physical_device::{select_physical_device, PhysicalDeviceInfo};
#[cfg(feature = "shader-recompile")]
pub use vulkan_shader_compiler::ShadercCompiler;
