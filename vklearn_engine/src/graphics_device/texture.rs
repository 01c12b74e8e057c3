/// Image formats, image views and attachments

use std::any::Any;
use crate::graphics_device::Extent2D;

/// Pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    D32_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT_S8_UINT,
    /// Any other native format, kept as its raw value
    Other(i32),
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D32_SFLOAT | TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT_S8_UINT
        )
    }

    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT_S8_UINT)
    }
}

/// How an attachment image is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUsage {
    ColorAttachment,
    DepthStencilAttachment,
}

/// Descriptor for an attachment image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    pub extent: Extent2D,
    pub format: TextureFormat,
    pub usage: ImageUsage,
}

/// View over an image, usable as a framebuffer attachment
pub trait ImageView: Send + Sync {
    fn format(&self) -> TextureFormat;

    fn as_any(&self) -> &dyn Any;
}

/// Image + memory + view, owned together
///
/// Dropping it releases the view before the image and its memory.
pub trait Attachment: Send + Sync {
    fn image_view(&self) -> &dyn ImageView;

    fn extent(&self) -> Extent2D;

    fn format(&self) -> TextureFormat;
}
