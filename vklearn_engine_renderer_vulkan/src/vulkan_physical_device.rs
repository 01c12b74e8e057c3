/// Physical device selection
///
/// Devices are first described (`PhysicalDeviceInfo`), then chosen by a
/// pure rule so the rule can be tested without a GPU.

use ash::vk;
use std::ffi::CStr;
use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::{engine_debug, engine_error, engine_info, engine_warn};

/// What the selection rule needs to know about one physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDeviceInfo {
    pub name: String,
    /// First queue family with graphics support
    pub graphics_family: Option<u32>,
    /// First queue family able to present to the surface
    pub present_family: Option<u32>,
    /// `VK_KHR_swapchain` is available
    pub has_swapchain: bool,
}

impl PhysicalDeviceInfo {
    pub fn is_suitable(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some() && self.has_swapchain
    }
}

/// Index of the device to use
///
/// The suitable device named `preferred` wins; otherwise the first suitable
/// device. No suitable device is an `InitializationFailed` error.
pub fn select_physical_device(devices: &[PhysicalDeviceInfo], preferred: Option<&str>) -> Result<usize> {
    let mut suitable = devices.iter().enumerate().filter(|(_, info)| info.is_suitable());

    if let Some(name) = preferred {
        if let Some((index, _)) = devices
            .iter()
            .enumerate()
            .find(|(_, info)| info.is_suitable() && info.name == name)
        {
            return Ok(index);
        }
        engine_warn!("vklearn::vulkan", "Preferred device [{}] not found or not suitable", name);
    }

    suitable.next().map(|(index, _)| index).ok_or_else(|| {
        engine_error!("vklearn::vulkan", "No suitable physical device found");
        Error::InitializationFailed("No suitable physical device found".to_string())
    })
}

/// Physical device picked for the surface, with its queue families
pub(crate) struct SelectedDevice {
    pub physical_device: vk::PhysicalDevice,
    pub name: String,
    pub graphics_family: u32,
    pub present_family: u32,
}

/// Describe one device against `surface`
pub(crate) unsafe fn describe(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    physical_device: vk::PhysicalDevice,
) -> PhysicalDeviceInfo {
    let properties = instance.get_physical_device_properties(physical_device);
    let name = CStr::from_ptr(properties.device_name.as_ptr())
        .to_string_lossy()
        .into_owned();

    let queue_families = instance.get_physical_device_queue_family_properties(physical_device);
    let graphics_family = queue_families
        .iter()
        .position(|qf| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .map(|i| i as u32);
    let present_family = (0..queue_families.len() as u32).find(|&i| {
        surface_loader
            .get_physical_device_surface_support(physical_device, i, surface)
            .unwrap_or(false)
    });

    let has_swapchain = instance
        .enumerate_device_extension_properties(physical_device)
        .map(|extensions| {
            extensions.iter().any(|ext| {
                CStr::from_ptr(ext.extension_name.as_ptr()) == ash::khr::swapchain::NAME
            })
        })
        .unwrap_or(false);

    PhysicalDeviceInfo { name, graphics_family, present_family, has_swapchain }
}

/// Enumerate, describe and select the physical device for `surface`
pub(crate) unsafe fn pick(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    preferred: Option<&str>,
) -> Result<SelectedDevice> {
    let physical_devices = instance.enumerate_physical_devices().map_err(|e| {
        engine_error!("vklearn::vulkan", "Failed to enumerate physical devices: {:?}", e);
        Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
    })?;

    let infos: Vec<PhysicalDeviceInfo> = physical_devices
        .iter()
        .map(|&pd| describe(instance, surface_loader, surface, pd))
        .collect();
    for info in &infos {
        engine_debug!("vklearn::vulkan", "Found device [{}], suitable: {}", info.name, info.is_suitable());
    }

    let index = select_physical_device(&infos, preferred)?;
    let info = &infos[index];
    let (Some(graphics_family), Some(present_family)) = (info.graphics_family, info.present_family) else {
        return Err(Error::InitializationFailed(format!("Device [{}] lost its queue families", info.name)));
    };
    engine_info!(
        "vklearn::vulkan",
        "Selected device [{}] (graphics family {}, present family {})",
        info.name, graphics_family, present_family
    );

    Ok(SelectedDevice {
        physical_device: physical_devices[index],
        name: info.name.clone(),
        graphics_family,
        present_family,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, graphics: bool, present: bool, swapchain: bool) -> PhysicalDeviceInfo {
        PhysicalDeviceInfo {
            name: name.to_string(),
            graphics_family: graphics.then_some(0),
            present_family: present.then_some(0),
            has_swapchain: swapchain,
        }
    }

    #[test]
    fn test_first_suitable_without_preference() {
        let devices = [
            device("llvmpipe", true, true, false),
            device("Integrated", true, true, true),
            device("Discrete", true, true, true),
        ];
        assert_eq!(select_physical_device(&devices, None).unwrap(), 1);
    }

    #[test]
    fn test_preferred_name_wins() {
        let devices = [
            device("Integrated", true, true, true),
            device("Discrete", true, true, true),
        ];
        assert_eq!(select_physical_device(&devices, Some("Discrete")).unwrap(), 1);
    }

    #[test]
    fn test_unsuitable_preferred_falls_back() {
        let devices = [
            device("Discrete", false, true, true),
            device("Integrated", true, true, true),
        ];
        assert_eq!(select_physical_device(&devices, Some("Discrete")).unwrap(), 1);
    }

    #[test]
    fn test_unknown_preferred_falls_back() {
        let devices = [device("Integrated", true, true, true)];
        assert_eq!(select_physical_device(&devices, Some("Missing GPU")).unwrap(), 0);
    }

    #[test]
    fn test_no_suitable_device() {
        let devices = [
            device("NoGraphics", false, true, true),
            device("NoPresent", true, false, true),
            device("NoSwapchain", true, true, false),
        ];
        let err = select_physical_device(&devices, None).unwrap_err();
        assert!(matches!(err, Error::InitializationFailed(_)));
    }

    #[test]
    fn test_empty_device_list() {
        assert!(select_physical_device(&[], Some("Discrete")).is_err());
    }
}
