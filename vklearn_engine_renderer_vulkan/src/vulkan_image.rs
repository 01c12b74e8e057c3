/// Image views and attachments
///
/// `ImageView` wraps a view over an image owned by someone else (the
/// swapchain or an `Attachment`). `Attachment` owns image, memory and view.

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::{
    Attachment as GraphicsAttachment, Extent2D, ImageDesc, ImageUsage,
    ImageView as GraphicsImageView, TextureFormat,
};
use vklearn_engine::engine_err;

use crate::vulkan::format_to_vk;
use crate::vulkan_context::VulkanContext;

pub struct ImageView {
    pub(crate) view: vk::ImageView,
    format: TextureFormat,
    context: Arc<VulkanContext>,
}

fn aspect_for(format: TextureFormat) -> vk::ImageAspectFlags {
    if format.is_depth() {
        vk::ImageAspectFlags::DEPTH
    } else {
        vk::ImageAspectFlags::COLOR
    }
}

impl ImageView {
    /// 2D view over mip 0 / layer 0 of `image`
    pub(crate) fn new(context: Arc<VulkanContext>, image: vk::Image, format: TextureFormat) -> Result<Self> {
        let create_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format_to_vk(format))
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(aspect_for(format))
                    .base_mip_level(0)
                    .level_count(1)
                    .base_array_layer(0)
                    .layer_count(1),
            );

        let view = unsafe {
            context.device
                .create_image_view(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create image view: {:?}", e))?
        };

        Ok(Self { view, format, context })
    }

    pub(crate) fn downcast(view: &dyn GraphicsImageView) -> Result<vk::ImageView> {
        view.as_any()
            .downcast_ref::<ImageView>()
            .map(|v| v.view)
            .ok_or_else(|| crate::vulkan::foreign_resource("image view"))
    }
}

impl GraphicsImageView for ImageView {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_image_view(self.view, None);
        }
    }
}

/// Device-local image with its memory and view (depth buffers)
///
/// Field order is drop order: the view goes before the image it looks at.
pub struct Attachment {
    view: ImageView,
    image: AttachmentImage,
    extent: Extent2D,
    format: TextureFormat,
}

/// Image and its memory; releases whatever was created on drop
struct AttachmentImage {
    image: vk::Image,
    allocation: Option<Allocation>,
    context: Arc<VulkanContext>,
}

fn usage_to_vk(usage: ImageUsage) -> vk::ImageUsageFlags {
    match usage {
        ImageUsage::ColorAttachment => vk::ImageUsageFlags::COLOR_ATTACHMENT,
        ImageUsage::DepthStencilAttachment => vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
    }
}

impl AttachmentImage {
    fn new(context: Arc<VulkanContext>, desc: &ImageDesc) -> Result<Self> {
        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(format_to_vk(desc.format))
            .extent(vk::Extent3D { width: desc.extent.width, height: desc.extent.height, depth: 1 })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(usage_to_vk(desc.usage))
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        unsafe {
            let image = context.device
                .create_image(&image_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create attachment image: {:?}", e))?;
            let mut owned = Self { image, allocation: None, context };

            let requirements = owned.context.device.get_image_memory_requirements(image);
            let allocation = owned.context.allocator()?
                .allocate(&AllocationCreateDesc {
                    name: "attachment",
                    requirements,
                    location: MemoryLocation::GpuOnly,
                    linear: false,
                    allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                })
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to allocate attachment memory: {:?}", e))?;
            let (memory, offset) = (allocation.memory(), allocation.offset());
            owned.allocation = Some(allocation);

            owned.context.device
                .bind_image_memory(image, memory, offset)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to bind attachment memory: {:?}", e))?;

            Ok(owned)
        }
    }
}

impl Drop for AttachmentImage {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_image(self.image, None);

            if let Some(allocation) = self.allocation.take() {
                if let Ok(mut allocator) = self.context.allocator() {
                    allocator.free(allocation).ok();
                }
            }
        }
    }
}

impl Attachment {
    pub(crate) fn new(context: Arc<VulkanContext>, desc: &ImageDesc) -> Result<Self> {
        if desc.extent.width == 0 || desc.extent.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Attachment extent {}x{} is empty",
                desc.extent.width, desc.extent.height
            )));
        }

        let image = AttachmentImage::new(Arc::clone(&context), desc)?;
        let view = ImageView::new(context, image.image, desc.format)?;

        Ok(Self { view, image, extent: desc.extent, format: desc.format })
    }
}

impl GraphicsAttachment for Attachment {
    fn image_view(&self) -> &dyn GraphicsImageView {
        &self.view
    }

    fn extent(&self) -> Extent2D {
        self.extent
    }

    fn format(&self) -> TextureFormat {
        self.format
    }
}
