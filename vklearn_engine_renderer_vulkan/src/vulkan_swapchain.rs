/// Swapchain - Vulkan implementation of the NativeSwapchain trait
///
/// Owns the `VkSwapchainKHR` and one color view per presentable image. The
/// image ring and its semaphores live in the engine's `SwapChain`.

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::Result;
use vklearn_engine::vklearn::graphics::{
    AcquireOutcome, ImageView as GraphicsImageView, NativeSwapchain, PresentOutcome,
    Queue as GraphicsQueue, Semaphore as GraphicsSemaphore, SwapchainDesc,
};
use vklearn_engine::{engine_debug, engine_err};

use crate::vulkan::{color_space_to_vk, foreign_resource, format_to_vk, present_mode_to_vk};
use crate::vulkan_context::VulkanContext;
use crate::vulkan_image::ImageView;
use crate::vulkan_queue::Queue;
use crate::vulkan_sync::Semaphore;

pub struct Swapchain {
    swapchain: vk::SwapchainKHR,
    image_views: Vec<ImageView>,
    context: Arc<VulkanContext>,
}

/// Map the acquire result; only out-of-date is turned into a value
pub(crate) fn acquire_outcome(result: ash::prelude::VkResult<(u32, bool)>) -> Result<AcquireOutcome> {
    match result {
        Ok((index, false)) => Ok(AcquireOutcome::Success(index)),
        Ok((index, true)) => Ok(AcquireOutcome::Suboptimal(index)),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquireOutcome::OutOfDate),
        Err(e) => Err(engine_err!("vklearn::vulkan", "Failed to acquire next swapchain image: {:?}", e)),
    }
}

/// Map the present result; only out-of-date is turned into a value
pub(crate) fn present_outcome(result: ash::prelude::VkResult<bool>) -> Result<PresentOutcome> {
    match result {
        Ok(false) => Ok(PresentOutcome::Success),
        Ok(true) => Ok(PresentOutcome::Suboptimal),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentOutcome::OutOfDate),
        Err(e) => Err(engine_err!("vklearn::vulkan", "Failed to present swapchain image: {:?}", e)),
    }
}

impl Swapchain {
    pub(crate) fn new(context: Arc<VulkanContext>, desc: &SwapchainDesc) -> Result<Self> {
        unsafe {
            let capabilities = context.surface_loader
                .get_physical_device_surface_capabilities(context.physical_device, context.surface)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to get surface capabilities: {:?}", e))?;

            let queue_family_indices = [context.graphics_queue_family, context.present_queue_family];
            let (sharing_mode, family_indices): (vk::SharingMode, &[u32]) =
                if context.graphics_queue_family != context.present_queue_family {
                    (vk::SharingMode::CONCURRENT, &queue_family_indices)
                } else {
                    (vk::SharingMode::EXCLUSIVE, &[])
                };

            let create_info = vk::SwapchainCreateInfoKHR::default()
                .surface(context.surface)
                .min_image_count(desc.image_count)
                .image_format(format_to_vk(desc.format.format))
                .image_color_space(color_space_to_vk(desc.format.color_space))
                .image_extent(vk::Extent2D { width: desc.extent.width, height: desc.extent.height })
                .image_array_layers(1)
                .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
                .image_sharing_mode(sharing_mode)
                .queue_family_indices(family_indices)
                .pre_transform(capabilities.current_transform)
                .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
                .present_mode(present_mode_to_vk(desc.present_mode))
                .clipped(true);

            let swapchain = context.swapchain_loader
                .create_swapchain(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create swapchain: {:?}", e))?;

            // From here on, Drop releases the swapchain and any view already created
            let mut native = Self { swapchain, image_views: Vec::new(), context: Arc::clone(&context) };

            let images = context.swapchain_loader
                .get_swapchain_images(swapchain)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to get swapchain images: {:?}", e))?;

            native.image_views.reserve(images.len());
            for image in images {
                native.image_views.push(ImageView::new(Arc::clone(&context), image, desc.format.format)?);
            }

            engine_debug!(
                "vklearn::vulkan",
                "Created swapchain {}x{} with {} images (requested {})",
                desc.extent.width, desc.extent.height, native.image_views.len(), desc.image_count
            );

            Ok(native)
        }
    }
}

impl NativeSwapchain for Swapchain {
    fn image_count(&self) -> usize {
        self.image_views.len()
    }

    fn image_view(&self, index: usize) -> Option<&dyn GraphicsImageView> {
        self.image_views.get(index).map(|view| view as &dyn GraphicsImageView)
    }

    fn acquire_next_image(&self, signal: &dyn GraphicsSemaphore) -> Result<AcquireOutcome> {
        let semaphore = Semaphore::downcast(signal)?;
        let result = unsafe {
            self.context.swapchain_loader
                .acquire_next_image(self.swapchain, u64::MAX, semaphore, vk::Fence::null())
        };
        acquire_outcome(result)
    }

    fn present(
        &self,
        queue: &dyn GraphicsQueue,
        wait: &dyn GraphicsSemaphore,
        image_index: u32,
    ) -> Result<PresentOutcome> {
        let queue = queue
            .as_any()
            .downcast_ref::<Queue>()
            .ok_or_else(|| foreign_resource("queue"))?;

        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let wait_semaphores = [Semaphore::downcast(wait)?];

        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let native_queue = queue.lock()?;
        let result = unsafe { self.context.swapchain_loader.queue_present(*native_queue, &present_info) };
        present_outcome(result)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        // Views before the swapchain that owns their images
        self.image_views.clear();

        unsafe {
            self.context.swapchain_loader.destroy_swapchain(self.swapchain, None);
        }
    }
}
