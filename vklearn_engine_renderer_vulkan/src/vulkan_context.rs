/// VulkanContext - native objects shared by every Vulkan resource
///
/// Every resource created by `VulkanGraphicsDevice` holds an
/// `Arc<VulkanContext>`, so the logical device, the allocator and the
/// surface stay alive until the last resource is dropped.

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::mem::ManuallyDrop;
use std::sync::{Mutex, MutexGuard};
use vklearn_engine::vklearn::{Error, Result};

pub struct VulkanContext {
    /// Keeps the Vulkan library loaded
    _entry: ash::Entry,

    pub instance: ash::Instance,

    pub physical_device: vk::PhysicalDevice,

    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so its memory blocks are freed before the device
    pub allocator: ManuallyDrop<Mutex<Allocator>>,

    pub surface_loader: ash::khr::surface::Instance,

    pub surface: vk::SurfaceKHR,

    pub swapchain_loader: ash::khr::swapchain::Device,

    pub graphics_queue_family: u32,

    pub present_queue_family: u32,

    /// Debug utils loader (validation only)
    debug_utils_loader: Option<ash::ext::debug_utils::Instance>,

    /// Debug messenger handle (validation only)
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

impl VulkanContext {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        entry: ash::Entry,
        instance: ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        allocator: Allocator,
        surface_loader: ash::khr::surface::Instance,
        surface: vk::SurfaceKHR,
        graphics_queue_family: u32,
        present_queue_family: u32,
        debug_utils: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    ) -> Self {
        let swapchain_loader = ash::khr::swapchain::Device::new(&instance, &device);
        let (debug_utils_loader, debug_messenger) = match debug_utils {
            Some((loader, messenger)) => (Some(loader), Some(messenger)),
            None => (None, None),
        };

        Self {
            _entry: entry,
            instance,
            physical_device,
            device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            surface_loader,
            surface,
            swapchain_loader,
            graphics_queue_family,
            present_queue_family,
            debug_utils_loader,
            debug_messenger,
        }
    }

    /// Lock the allocator
    pub fn allocator(&self) -> Result<MutexGuard<'_, Allocator>> {
        self.allocator
            .lock()
            .map_err(|_| Error::BackendError("GPU allocator mutex poisoned".to_string()))
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            self.surface_loader.destroy_surface(self.surface, None);

            // Free VkDeviceMemory blocks BEFORE destroying the device
            ManuallyDrop::drop(&mut self.allocator);

            self.device.destroy_device(None);

            // Destroy debug messenger BEFORE the instance
            if let (Some(debug_utils), Some(messenger)) = (&self.debug_utils_loader, self.debug_messenger) {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
    }
}
