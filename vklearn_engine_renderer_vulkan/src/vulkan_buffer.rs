/// Buffer - Vulkan implementation of the Buffer trait
///
/// Vertex and index buffers live in device-local (`GpuOnly`) memory and are
/// filled by transfer. Staging buffers are host-visible (`CpuToGpu`) and
/// persistently mapped; `update` is a plain memcpy into the mapping.

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::any::Any;
use std::sync::Arc;
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::{Buffer as GraphicsBuffer, BufferDesc, BufferUsage};
use vklearn_engine::{engine_err, engine_error};

use crate::vulkan_context::VulkanContext;

/// Vulkan buffer implementation
pub struct Buffer {
    /// Shared GPU context (device, allocator)
    ctx: Arc<VulkanContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// GPU memory allocation
    pub(crate) allocation: Option<Allocation>,
    /// Buffer size
    pub(crate) size: u64,
    /// Usage the buffer was created for
    usage: BufferUsage,
}

fn usage_to_vk(usage: BufferUsage) -> vk::BufferUsageFlags {
    match usage {
        BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
        BufferUsage::Index => vk::BufferUsageFlags::INDEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
        BufferUsage::Staging => vk::BufferUsageFlags::TRANSFER_SRC,
    }
}

fn memory_location(usage: BufferUsage) -> MemoryLocation {
    if usage.is_host_visible() {
        MemoryLocation::CpuToGpu
    } else {
        MemoryLocation::GpuOnly
    }
}

impl Buffer {
    pub(crate) fn new(ctx: Arc<VulkanContext>, desc: &BufferDesc) -> Result<Self> {
        if desc.size == 0 {
            return Err(Error::InvalidResource("Cannot create an empty buffer".to_string()));
        }

        unsafe {
            let buffer_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(usage_to_vk(desc.usage))
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = ctx.device.create_buffer(&buffer_info, None)
                .map_err(|e| engine_err!("vklearn::vulkan", "Failed to create buffer: {:?}", e))?;

            let requirements = ctx.device.get_buffer_memory_requirements(buffer);

            let allocation = ctx.allocator()
                .and_then(|mut allocator| {
                    allocator
                        .allocate(&AllocationCreateDesc {
                            name: "buffer",
                            requirements,
                            location: memory_location(desc.usage),
                            linear: true,
                            allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                        })
                        .map_err(|e| engine_err!("vklearn::vulkan", "Failed to allocate buffer memory: {:?}", e))
                });
            let allocation = match allocation {
                Ok(allocation) => allocation,
                Err(e) => {
                    ctx.device.destroy_buffer(buffer, None);
                    return Err(e);
                }
            };

            if let Err(e) = ctx.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset()) {
                if let Ok(mut allocator) = ctx.allocator() {
                    allocator.free(allocation).ok();
                }
                ctx.device.destroy_buffer(buffer, None);
                return Err(engine_err!("vklearn::vulkan", "Failed to bind buffer memory: {:?}", e));
            }

            Ok(Self {
                ctx,
                buffer,
                allocation: Some(allocation),
                size: desc.size,
                usage: desc.usage,
            })
        }
    }

    pub(crate) fn downcast(buffer: &dyn GraphicsBuffer) -> Result<vk::Buffer> {
        buffer
            .as_any()
            .downcast_ref::<Buffer>()
            .map(|b| b.buffer)
            .ok_or_else(|| crate::vulkan::foreign_resource("buffer"))
    }
}

impl GraphicsBuffer for Buffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if !self.usage.is_host_visible() {
            return Err(Error::InvalidResource(format!("{:?} buffer is not host-visible", self.usage)));
        }
        let end = offset.checked_add(data.len() as u64);
        if !matches!(end, Some(end) if end <= self.size) {
            return Err(Error::InvalidResource(format!(
                "Buffer update of {} bytes at offset {} exceeds buffer size {}",
                data.len(), offset, self.size
            )));
        }

        unsafe {
            if let Some(allocation) = &self.allocation {
                // Map memory and copy data
                let mapped_ptr = allocation
                    .mapped_ptr()
                    .ok_or_else(|| Error::BackendError("Buffer is not CPU-accessible".to_string()))?
                    .as_ptr() as *mut u8;

                std::ptr::copy_nonoverlapping(
                    data.as_ptr(),
                    mapped_ptr.add(offset as usize),
                    data.len(),
                );

                Ok(())
            } else {
                engine_error!("vklearn::vulkan", "Buffer update failed: no GPU allocation");
                Err(Error::BackendError("Buffer has no allocation".to_string()))
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                // Don't panic if lock fails - we still need to destroy the buffer
                if let Ok(mut allocator) = self.ctx.allocator() {
                    allocator.free(allocation).ok();
                }
            }

            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
