/// RenderPass trait and render pass descriptor

use std::any::Any;
use bitflags::bitflags;
use crate::graphics_device::{PipelineStageFlags, TextureFormat};

/// Render pass
///
/// Describes how attachments are loaded, stored, and transitioned during rendering.
pub trait RenderPass: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Descriptor for a single-subpass render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDesc {
    /// Color attachments, referenced in order by the subpass
    pub color_attachments: Vec<AttachmentDesc>,
    /// Optional depth attachment, placed after the color attachments
    pub depth_attachment: Option<AttachmentDesc>,
    /// Subpass dependencies
    pub dependencies: Vec<SubpassDependency>,
}

/// Descriptor for a single attachment in a render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentDesc {
    /// Pixel format
    pub format: TextureFormat,
    /// Number of samples (1 = no MSAA)
    pub samples: u32,
    /// Load operation (what to do with existing content)
    pub load_op: LoadOp,
    /// Store operation (what to do with rendered content)
    pub store_op: StoreOp,
    /// Initial layout (how the attachment starts)
    pub initial_layout: ImageLayout,
    /// Final layout (how the attachment ends)
    pub final_layout: ImageLayout,
}

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    /// Load existing content
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    DontCare,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Store the rendered content
    Store,
    /// Don't care about storing the content
    DontCare,
}

/// Image layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    /// Undefined layout (initial state)
    Undefined,
    /// Layout for color attachment
    ColorAttachment,
    /// Layout for depth/stencil attachment
    DepthStencilAttachment,
    /// Layout for presenting to swapchain
    PresentSrc,
}

bitflags! {
    /// Memory access types covered by a dependency
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const COLOR_ATTACHMENT_READ = 1 << 0;
        const COLOR_ATTACHMENT_WRITE = 1 << 1;
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 2;
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 3;
    }
}

/// Execution + memory dependency into or out of the subpass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubpassDependency {
    /// `None` means external to the render pass
    pub src_subpass: Option<u32>,
    pub dst_subpass: u32,
    pub src_stage: PipelineStageFlags,
    pub dst_stage: PipelineStageFlags,
    pub src_access: AccessFlags,
    pub dst_access: AccessFlags,
}
