/// Window-side state shared between the platform layer and the renderer

pub mod window_size;
pub mod mouse_input;

pub use window_size::*;
pub use mouse_input::*;
