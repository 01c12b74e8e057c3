/// ForwardRenderer - per-frame driver: acquire, record, submit, present, resize
///
/// Owns the swapchain and everything that depends on it. A rebuild always
/// waits for the device and the graphics queue to go idle and drops the old
/// swapchain before the new one is created.

use std::sync::Arc;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Queue};
use crate::renderer::forward_render_activity::ForwardRenderActivity;
use crate::renderer::model::{GpuModel, ModelData};
use crate::renderer::shader_compiler::{ForwardShaders, ShaderCompiler};
use crate::renderer::swap_chain::SwapChain;
use crate::scene::Scene;
use crate::window::WindowSize;
use crate::{engine_debug, engine_info, engine_warn};

pub struct ForwardRenderer {
    // Field order is drop order; the activity owns the command pool and pipeline cache
    models: Vec<GpuModel>,
    activity: ForwardRenderActivity,
    swap_chain: Option<SwapChain>,
    graphics_queue: Arc<dyn Queue>,
    present_queue: Arc<dyn Queue>,
    device: Arc<dyn GraphicsDevice>,

    requested_images: u32,
    vsync: bool,
}

impl ForwardRenderer {
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        window: &WindowSize,
        config: &EngineConfig,
        shaders: &ForwardShaders,
        compiler: Option<&dyn ShaderCompiler>,
    ) -> Result<Self> {
        if !window.is_valid() {
            return Err(Error::InitializationFailed(format!(
                "window size {}x{} cannot back a swapchain",
                window.width(),
                window.height()
            )));
        }

        let command_pool = device.create_command_pool()?;
        let pipeline_cache = device.create_pipeline_cache()?;
        let swap_chain = SwapChain::new(device.as_ref(), window, config.requested_images, config.vsync)?;
        let activity = ForwardRenderActivity::new(
            Arc::clone(&device),
            &swap_chain,
            command_pool,
            pipeline_cache,
            shaders,
            config,
            compiler,
        )?;

        engine_info!(
            "vklearn::ForwardRenderer",
            "Forward renderer ready ({} swapchain image(s), {:?})",
            swap_chain.image_count(),
            swap_chain.present_mode()
        );

        Ok(Self {
            models: Vec::new(),
            activity,
            swap_chain: Some(swap_chain),
            graphics_queue: device.graphics_queue(),
            present_queue: device.present_queue(),
            device,
            requested_images: config.requested_images,
            vsync: config.vsync,
        })
    }

    /// Upload models on the graphics queue; entities reference them by model id
    pub fn load_models(&mut self, models: &[ModelData]) -> Result<()> {
        let uploaded = GpuModel::upload_all(
            self.device.as_ref(),
            self.activity.command_pool(),
            self.graphics_queue.as_ref(),
            models,
        )?;
        self.models.extend(uploaded);
        engine_debug!("vklearn::ForwardRenderer", "{} model(s) loaded", self.models.len());
        Ok(())
    }

    /// Render one frame
    ///
    /// A zero-sized window skips the frame. A dirty size or an out-of-date
    /// swapchain triggers a rebuild first; an out-of-date present is
    /// handled on the next frame.
    pub fn render(&mut self, window: &mut WindowSize, scene: &mut Scene) -> Result<()> {
        if !window.is_valid() {
            return Ok(());
        }

        let stale = window.is_dirty() || self.current_swap_chain()?.acquire_next_image()?;
        if stale {
            window.mark_clean();
            self.resize(window, scene)?;
            if self.current_swap_chain()?.acquire_next_image()? {
                engine_debug!("vklearn::ForwardRenderer", "Swapchain still out of date after rebuild, skipping frame");
                window.mark_dirty();
                return Ok(());
            }
        }

        let swap_chain = self.swap_chain.as_mut().ok_or_else(missing_swap_chain)?;
        self.activity.record_command_buffer(swap_chain, &self.models, scene)?;
        self.activity.submit(swap_chain, self.graphics_queue.as_ref())?;
        if swap_chain.present_image(self.present_queue.as_ref())? {
            window.mark_dirty();
        }
        Ok(())
    }

    fn resize(&mut self, window: &WindowSize, scene: &mut Scene) -> Result<()> {
        self.device.wait_idle()?;
        self.graphics_queue.wait_idle()?;

        // Framebuffers hold the old image views
        self.activity.release_swapchain_resources();
        self.swap_chain = None;
        let swap_chain = SwapChain::new(self.device.as_ref(), window, self.requested_images, self.vsync)?;
        let extent = swap_chain.extent();
        scene.projection_mut().resize(extent.width, extent.height);
        self.activity.resize(&swap_chain)?;
        self.swap_chain = Some(swap_chain);

        engine_debug!("vklearn::ForwardRenderer", "Resized to {}x{}", extent.width, extent.height);
        Ok(())
    }

    fn current_swap_chain(&mut self) -> Result<&mut SwapChain> {
        self.swap_chain.as_mut().ok_or_else(missing_swap_chain)
    }

    pub fn swap_chain(&self) -> Option<&SwapChain> {
        self.swap_chain.as_ref()
    }

    pub fn models(&self) -> &[GpuModel] {
        &self.models
    }

    pub fn activity(&self) -> &ForwardRenderActivity {
        &self.activity
    }

    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }
}

fn missing_swap_chain() -> Error {
    Error::InvalidResource("swapchain lost during a failed rebuild".to_string())
}

impl Drop for ForwardRenderer {
    fn drop(&mut self) {
        let idle = [
            self.present_queue.wait_idle(),
            self.graphics_queue.wait_idle(),
            self.device.wait_idle(),
        ];
        for result in idle {
            if let Err(e) = result {
                engine_warn!("vklearn::ForwardRenderer", "Wait idle failed during teardown: {}", e);
            }
        }
    }
}

#[cfg(test)]
#[path = "forward_renderer_tests.rs"]
mod tests;
