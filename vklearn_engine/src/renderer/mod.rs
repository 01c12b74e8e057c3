/// Renderer module - swapchain ring, forward render activity and the frame loop

// Module declarations
pub mod swap_chain;
pub mod forward_render_activity;
pub mod forward_renderer;
pub mod push_constants;
pub mod vertex;
pub mod model;
pub mod shader_compiler;

pub use swap_chain::*;
pub use forward_render_activity::*;
pub use forward_renderer::*;
pub use push_constants::*;
pub use vertex::*;
pub use model::*;
pub use shader_compiler::*;
