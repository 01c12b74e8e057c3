/// SwapChain - presentable image ring with acquire/present staleness signaling
///
/// Wraps the backend `NativeSwapchain` with one `SyncSemaphores` pair per
/// image and the `current_frame` ring counter. A SwapChain is never
/// mutated after creation: on resize the renderer drops it and builds a
/// new one.

use crate::error::{Error, Result};
use crate::graphics_device::{
    AcquireOutcome, ColorSpace, Extent2D, GraphicsDevice, ImageView, NativeSwapchain,
    PresentMode, PresentOutcome, Queue, Semaphore, SurfaceCapabilities, SurfaceFormat,
    SwapchainDesc, TextureFormat,
};
use crate::window::WindowSize;
use crate::{engine_debug, engine_warn};

/// Image-acquisition / render-complete semaphore pair of one image slot
pub struct SyncSemaphores {
    /// Signaled by the presentation engine when the image can be rendered to
    pub img_acquisition: Box<dyn Semaphore>,
    /// Signaled by the graphics queue when drawing is done, waited on by present
    pub render_complete: Box<dyn Semaphore>,
}

impl SyncSemaphores {
    pub fn new(device: &dyn GraphicsDevice) -> Result<Self> {
        Ok(Self {
            img_acquisition: device.create_semaphore()?,
            render_complete: device.create_semaphore()?,
        })
    }
}

pub struct SwapChain {
    // Semaphores are declared first so they drop before the native swapchain
    sync_semaphores: Vec<SyncSemaphores>,
    native: Box<dyn NativeSwapchain>,
    surface_format: SurfaceFormat,
    extent: Extent2D,
    present_mode: PresentMode,
    current_frame: usize,
}

impl SwapChain {
    /// Negotiate image count, extent, format and present mode, then build
    /// the native swapchain and one semaphore pair per image
    pub fn new(
        device: &dyn GraphicsDevice,
        window: &WindowSize,
        requested_images: u32,
        vsync: bool,
    ) -> Result<Self> {
        let capabilities = device.surface_capabilities()?;
        let image_count = calculate_image_count(&capabilities, requested_images);
        let extent = calculate_extent(&capabilities, window);
        let surface_format = choose_surface_format(&device.surface_formats()?)?;
        let present_mode = select_present_mode(&device.surface_present_modes()?, vsync);

        let native = device.create_native_swapchain(&SwapchainDesc {
            image_count,
            format: surface_format,
            extent,
            present_mode,
        })?;

        let actual_count = native.image_count();
        if actual_count == 0 {
            return Err(Error::InitializationFailed("swapchain has no images".to_string()));
        }

        let sync_semaphores = (0..actual_count)
            .map(|_| SyncSemaphores::new(device))
            .collect::<Result<Vec<_>>>()?;

        engine_debug!(
            "vklearn::SwapChain",
            "Created swapchain: {} image(s) (requested {}), {}x{}, {:?}, {:?}",
            actual_count,
            image_count,
            extent.width,
            extent.height,
            surface_format.format,
            present_mode
        );

        Ok(Self {
            sync_semaphores,
            native,
            surface_format,
            extent,
            present_mode,
            current_frame: 0,
        })
    }

    /// Acquire the next image; `true` means the swapchain is out of date
    ///
    /// Blocks until the presentation engine hands out an image.
    /// `current_frame` becomes the acquired image index.
    pub fn acquire_next_image(&mut self) -> Result<bool> {
        let semaphore = self.sync_semaphores[self.current_frame].img_acquisition.as_ref();
        match self.native.acquire_next_image(semaphore)? {
            AcquireOutcome::OutOfDate => Ok(true),
            AcquireOutcome::Success(index) | AcquireOutcome::Suboptimal(index) => {
                let index = index as usize;
                if index >= self.image_count() {
                    return Err(Error::InvalidResource(format!(
                        "acquired image index {} outside swapchain of {} image(s)",
                        index,
                        self.image_count()
                    )));
                }
                self.current_frame = index;
                Ok(false)
            }
        }
    }

    /// Present the current image; `true` means the swapchain is out of date
    ///
    /// The ring advances by one whatever the outcome.
    pub fn present_image(&mut self, queue: &dyn Queue) -> Result<bool> {
        let semaphore = self.sync_semaphores[self.current_frame].render_complete.as_ref();
        let outcome = self.native.present(queue, semaphore, self.current_frame as u32);
        self.current_frame = (self.current_frame + 1) % self.image_count();
        Ok(outcome? == PresentOutcome::OutOfDate)
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn image_count(&self) -> usize {
        self.sync_semaphores.len()
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub fn surface_format(&self) -> SurfaceFormat {
        self.surface_format
    }

    pub fn present_mode(&self) -> PresentMode {
        self.present_mode
    }

    pub fn image_view(&self, index: usize) -> Option<&dyn ImageView> {
        self.native.image_view(index)
    }

    /// Semaphore pair of the current frame
    pub fn sync_semaphores(&self) -> &SyncSemaphores {
        &self.sync_semaphores[self.current_frame]
    }
}

// ===== NEGOTIATION =====

/// `requested` clamped into `[min_image_count, max_image_count]`, 0 max meaning unbounded
pub fn calculate_image_count(capabilities: &SurfaceCapabilities, requested: u32) -> u32 {
    let mut count = requested.max(capabilities.min_image_count);
    if capabilities.max_image_count > 0 {
        count = count.min(capabilities.max_image_count);
    }
    count
}

/// The surface's current extent when defined, else the window size clamped to the surface limits
pub fn calculate_extent(capabilities: &SurfaceCapabilities, window: &WindowSize) -> Extent2D {
    if capabilities.has_current_extent() {
        return capabilities.current_extent;
    }
    let min = capabilities.min_image_extent;
    let max = capabilities.max_image_extent;
    Extent2D::new(
        window.width().clamp(min.width, max.width.max(min.width)),
        window.height().clamp(min.height, max.height.max(min.height)),
    )
}

/// B8G8R8A8 sRGB with the sRGB non-linear color space if offered, else the first format
pub fn choose_surface_format(formats: &[SurfaceFormat]) -> Result<SurfaceFormat> {
    let first = formats
        .first()
        .copied()
        .ok_or_else(|| Error::InitializationFailed("surface reports no formats".to_string()))?;
    Ok(formats
        .iter()
        .copied()
        .find(|f| f.format == TextureFormat::B8G8R8A8_SRGB && f.color_space == ColorSpace::SrgbNonLinear)
        .unwrap_or(first))
}

/// FIFO when `vsync`, else the first available non-blocking mode
pub fn select_present_mode(modes: &[PresentMode], vsync: bool) -> PresentMode {
    if vsync {
        return PresentMode::Fifo;
    }
    [PresentMode::Immediate, PresentMode::Mailbox]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or_else(|| {
            engine_warn!("vklearn::SwapChain", "No non-blocking present mode available, falling back to FIFO");
            PresentMode::Fifo
        })
}

#[cfg(test)]
#[path = "swap_chain_tests.rs"]
mod tests;
