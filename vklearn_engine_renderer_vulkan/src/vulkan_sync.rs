/// Fence and Semaphore - Vulkan implementations of the sync traits

use ash::vk;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::Result;
use vklearn_engine::vklearn::graphics::{Fence as GraphicsFence, Semaphore as GraphicsSemaphore};
use vklearn_engine::engine_err;

use crate::vulkan_context::VulkanContext;

pub struct Fence {
    pub(crate) fence: vk::Fence,
    context: Arc<VulkanContext>,
}

impl Fence {
    pub(crate) fn new(context: Arc<VulkanContext>, signaled: bool) -> Result<Self> {
        let flags = if signaled { vk::FenceCreateFlags::SIGNALED } else { vk::FenceCreateFlags::empty() };
        let create_info = vk::FenceCreateInfo::default().flags(flags);

        let fence = unsafe {
            context.device.create_fence(&create_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create fence: {:?}", e))?
        };

        Ok(Self { fence, context })
    }

    pub(crate) fn downcast(fence: &dyn GraphicsFence) -> Result<vk::Fence> {
        fence
            .as_any()
            .downcast_ref::<Fence>()
            .map(|f| f.fence)
            .ok_or_else(|| crate::vulkan::foreign_resource("fence"))
    }
}

impl GraphicsFence for Fence {
    fn wait(&self) -> Result<()> {
        unsafe {
            self.context.device
                .wait_for_fences(&[self.fence], true, u64::MAX)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to wait for fence: {:?}", e))
        }
    }

    fn reset(&self) -> Result<()> {
        unsafe {
            self.context.device
                .reset_fences(&[self.fence])
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to reset fence: {:?}", e))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_fence(self.fence, None);
        }
    }
}

pub struct Semaphore {
    pub(crate) semaphore: vk::Semaphore,
    context: Arc<VulkanContext>,
}

impl Semaphore {
    pub(crate) fn new(context: Arc<VulkanContext>) -> Result<Self> {
        let semaphore = unsafe {
            context.device
                .create_semaphore(&vk::SemaphoreCreateInfo::default(), None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create semaphore: {:?}", e))?
        };

        Ok(Self { semaphore, context })
    }

    /// Downcast a trait object created by this backend
    pub(crate) fn downcast(semaphore: &dyn GraphicsSemaphore) -> Result<vk::Semaphore> {
        semaphore
            .as_any()
            .downcast_ref::<Semaphore>()
            .map(|s| s.semaphore)
            .ok_or_else(|| crate::vulkan::foreign_resource("semaphore"))
    }
}

impl GraphicsSemaphore for Semaphore {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_semaphore(self.semaphore, None);
        }
    }
}
