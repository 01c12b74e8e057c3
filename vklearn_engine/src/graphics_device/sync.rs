/// Synchronization primitives: fences (GPU to CPU) and semaphores (GPU to GPU)

use std::any::Any;
use crate::error::Result;

/// Binary GPU to CPU signal
///
/// A fence guards exactly one in-flight frame slot. It must be waited on
/// and reset before the command buffer of that slot is reused.
pub trait Fence: Send + Sync {
    /// Block until signaled, without timeout
    fn wait(&self) -> Result<()>;

    /// Return to the unsignaled state
    fn reset(&self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Binary GPU to GPU signal
pub trait Semaphore: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}
