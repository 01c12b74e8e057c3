/// Graphics device module - backend-facing traits and descriptors
///
/// The core renderer only talks to the GPU through these traits. Backends
/// recover their concrete types through `as_any()` downcasts.

// Module declarations
pub mod graphics_device;
pub mod sync;
pub mod queue;
pub mod swapchain;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod command_buffer;
pub mod render_pass;
pub mod frame_buffer;
pub mod pipeline;

pub use graphics_device::*;
pub use sync::*;
pub use queue::*;
pub use swapchain::*;
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use command_buffer::*;
pub use render_pass::*;
pub use frame_buffer::*;
pub use pipeline::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
