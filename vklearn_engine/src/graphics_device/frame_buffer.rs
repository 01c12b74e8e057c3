/// Framebuffer trait - binds image views to a render pass
///
/// Created once per swapchain image and recreated only when the
/// swapchain is rebuilt.

use std::any::Any;
use crate::graphics_device::{ImageView, RenderPass};

/// Framebuffer - set of attachments a render pass renders into
pub trait Framebuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    fn as_any(&self) -> &dyn Any;
}

/// Descriptor for creating a framebuffer
pub struct FramebufferDesc<'a> {
    /// The render pass this framebuffer is compatible with
    pub render_pass: &'a dyn RenderPass,
    /// Attachments in render pass order (colors first, then depth)
    pub attachments: Vec<&'a dyn ImageView>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}
