/// Native swapchain trait and surface descriptors
///
/// `NativeSwapchain` is the thin backend object (images, views, acquire and
/// present calls). The image ring, semaphore pairs and staleness protocol
/// live in `renderer::SwapChain`.

use std::any::Any;
use crate::error::Result;
use crate::graphics_device::{ImageView, Queue, Semaphore, TextureFormat};

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Surface limits reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub min_image_count: u32,
    /// 0 means no upper bound
    pub max_image_count: u32,
    /// `UNDEFINED_EXTENT` in both dimensions when the window decides
    pub current_extent: Extent2D,
    pub min_image_extent: Extent2D,
    pub max_image_extent: Extent2D,
}

impl SurfaceCapabilities {
    /// Sentinel meaning "the surface size follows the swapchain extent"
    pub const UNDEFINED_EXTENT: u32 = u32::MAX;

    pub fn has_current_extent(&self) -> bool {
        self.current_extent.width != Self::UNDEFINED_EXTENT
    }
}

/// Color space of a presentable surface format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    SrgbNonLinear,
    /// Any other native color space, kept as its raw value
    Other(i32),
}

/// Color format + color space pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFormat {
    pub format: TextureFormat,
    pub color_space: ColorSpace,
}

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// Non-blocking, may tear
    Immediate,
    /// Non-blocking, replaces the queued image
    Mailbox,
    /// Vertical sync, always supported
    Fifo,
    /// Vertical sync, tears when late
    FifoRelaxed,
}

/// Parameters for building a native swapchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainDesc {
    /// Minimum number of images to request
    pub image_count: u32,
    pub format: SurfaceFormat,
    pub extent: Extent2D,
    pub present_mode: PresentMode,
}

/// Result of asking the presentation engine for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// Image index available
    Success(u32),
    /// Image index available, but the swapchain no longer matches the surface exactly
    Suboptimal(u32),
    /// The swapchain cannot be used anymore and must be rebuilt
    OutOfDate,
}

/// Result of queueing an image for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    Success,
    Suboptimal,
    OutOfDate,
}

/// Backend swapchain: presentable images and the acquire/present calls
///
/// Any native code other than success, suboptimal or out-of-date must be
/// returned as an `Err`.
pub trait NativeSwapchain: Send + Sync {
    /// Number of presentable images actually created
    fn image_count(&self) -> usize;

    /// Color view of image `index`
    fn image_view(&self, index: usize) -> Option<&dyn ImageView>;

    /// Wait (without timeout) for the next image; `signal` fires when it is usable
    fn acquire_next_image(&self, signal: &dyn Semaphore) -> Result<AcquireOutcome>;

    /// Queue image `image_index` for presentation once `wait` is signaled
    fn present(&self, queue: &dyn Queue, wait: &dyn Semaphore, image_index: u32) -> Result<PresentOutcome>;

    fn as_any(&self) -> &dyn Any;
}
