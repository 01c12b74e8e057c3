/// Queue - Vulkan implementation of the Queue trait
///
/// `vkQueueSubmit`, `vkQueuePresentKHR` and `vkQueueWaitIdle` need external
/// synchronization on the queue, hence the mutex. When graphics and present
/// families coincide both `Queue` objects share the same `Arc`.

use ash::vk;
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::{Queue as GraphicsQueue, SubmitInfo};
use vklearn_engine::engine_err;

use crate::vulkan::pipeline_stages_to_vk;
use crate::vulkan_command_buffer::CommandBuffer;
use crate::vulkan_context::VulkanContext;
use crate::vulkan_sync::{Fence, Semaphore};

pub struct Queue {
    queue: Mutex<vk::Queue>,
    family_index: u32,
    context: Arc<VulkanContext>,
}

impl Queue {
    pub(crate) fn new(context: Arc<VulkanContext>, family_index: u32) -> Self {
        let queue = unsafe { context.device.get_device_queue(family_index, 0) };
        Self { queue: Mutex::new(queue), family_index, context }
    }

    /// Lock the native queue for a call that needs external synchronization
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, vk::Queue>> {
        self.queue
            .lock()
            .map_err(|_| Error::BackendError("Queue mutex poisoned".to_string()))
    }
}

impl GraphicsQueue for Queue {
    fn submit(&self, info: &SubmitInfo<'_>) -> Result<()> {
        let command_buffers = [CommandBuffer::downcast(info.command_buffer)?];

        let mut wait_semaphores = Vec::with_capacity(1);
        let mut wait_stages = Vec::with_capacity(1);
        if let Some((semaphore, stage)) = info.wait_semaphore {
            wait_semaphores.push(Semaphore::downcast(semaphore)?);
            wait_stages.push(pipeline_stages_to_vk(stage));
        }

        let mut signal_semaphores = Vec::with_capacity(1);
        if let Some(semaphore) = info.signal_semaphore {
            signal_semaphores.push(Semaphore::downcast(semaphore)?);
        }

        let fence = match info.fence {
            Some(fence) => Fence::downcast(fence)?,
            None => vk::Fence::null(),
        };

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        let queue = self.lock()?;
        unsafe {
            self.context.device
                .queue_submit(*queue, &[submit_info], fence)
                .map_err(|e| match e {
                    vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => {
                        Error::OutOfMemory
                    }
                    e => engine_err!("vklearn::vulkan", "Failed to submit command buffer: {:?}", e),
                })
        }
    }

    fn wait_idle(&self) -> Result<()> {
        let queue = self.lock()?;
        unsafe {
            self.context.device
                .queue_wait_idle(*queue)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to wait for queue idle: {:?}", e))
        }
    }

    fn family_index(&self) -> u32 {
        self.family_index
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
