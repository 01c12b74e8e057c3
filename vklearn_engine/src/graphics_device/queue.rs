/// Queue trait and submission descriptor

use std::any::Any;
use bitflags::bitflags;
use crate::error::Result;
use crate::graphics_device::{CommandBuffer, Fence, Semaphore};

bitflags! {
    /// Pipeline stages, used for semaphore waits and subpass dependencies
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStageFlags: u32 {
        const TOP_OF_PIPE = 1 << 0;
        const VERTEX_INPUT = 1 << 1;
        const VERTEX_SHADER = 1 << 2;
        const EARLY_FRAGMENT_TESTS = 1 << 3;
        const FRAGMENT_SHADER = 1 << 4;
        const LATE_FRAGMENT_TESTS = 1 << 5;
        const COLOR_ATTACHMENT_OUTPUT = 1 << 6;
        const TRANSFER = 1 << 7;
        const BOTTOM_OF_PIPE = 1 << 8;
    }
}

/// One command buffer submission
pub struct SubmitInfo<'a> {
    /// Command buffer to execute (must have finished recording)
    pub command_buffer: &'a dyn CommandBuffer,
    /// Semaphore to wait on, and the stage that waits
    pub wait_semaphore: Option<(&'a dyn Semaphore, PipelineStageFlags)>,
    /// Semaphore signaled when execution completes
    pub signal_semaphore: Option<&'a dyn Semaphore>,
    /// Fence signaled when execution completes
    pub fence: Option<&'a dyn Fence>,
}

/// Device queue
pub trait Queue: Send + Sync {
    /// Submit one command buffer
    fn submit(&self, info: &SubmitInfo<'_>) -> Result<()>;

    /// Block until every submission on this queue has completed
    fn wait_idle(&self) -> Result<()>;

    /// Queue family index
    fn family_index(&self) -> u32;

    fn as_any(&self) -> &dyn Any;
}
