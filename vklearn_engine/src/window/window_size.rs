/// Window size state with a dirty flag
///
/// The platform layer reports resizes through `resize`, which marks the
/// size dirty. Only the renderer clears the flag, and only once it has
/// rebuilt every size-dependent resource.

use winit::dpi::PhysicalSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    width: u32,
    height: u32,
    dirty: bool,
}

impl WindowSize {
    /// Initial size; starts clean since the first swapchain is built from it
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, dirty: false }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Both dimensions are non-zero (a minimized window is not renderable)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Platform resize callback
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    /// Width / height, 1.0 for a degenerate size
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_valid() {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl From<PhysicalSize<u32>> for WindowSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
#[path = "window_size_tests.rs"]
mod tests;
