/*!
# vklearn engine

Core of a small Vulkan forward renderer: the swapchain image ring, the
per-frame acquire / record / submit / present protocol, and the resize
recovery path.

The core never calls Vulkan directly. Backends (see
`vklearn_engine_renderer_vulkan`) implement the `GraphicsDevice` family of
traits and hand an `Arc<dyn GraphicsDevice>` to the `ForwardRenderer`.

## Architecture

- **SwapChain**: presentable images, one semaphore pair per image, `current_frame` ring
- **ForwardRenderActivity**: render pass, pipeline, per-image command buffers / fences / framebuffers
- **ForwardRenderer**: per-frame driver and swapchain rebuilds
- **Scene**: entities grouped by model id, plus the projection
- **EngineConfig**: TOML settings passed explicitly to every component
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod window;
pub mod scene;
pub mod graphics_device;
pub mod renderer;
pub mod app;

// Main vklearn namespace module
pub mod vklearn {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging host
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{EngineConfig, DEFAULT_CONFIG_FILE};

    // Application hooks
    pub use crate::app::{AppLogic, UpdateTimer};

    // Logging sub-module (types only; the engine_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Backend-facing traits and descriptors
    pub mod graphics {
        pub use crate::graphics_device::*;
    }

    // Swapchain, forward activity, renderer, models
    pub mod render {
        pub use crate::renderer::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Window sub-module
    pub mod window {
        pub use crate::window::*;
    }
}

// Re-export math library at crate root
pub use glam;
