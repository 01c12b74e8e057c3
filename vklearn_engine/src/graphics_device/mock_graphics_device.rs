/// Mock graphics device for unit tests (no GPU required)
///
/// Every mock object shares one `MockState`. Calls are appended to
/// `MockState::events` as short strings (`"fence[1].wait"`,
/// `"swapchain[0].acquire(sem0)->Success(0)"`) so tests can assert on
/// ordering. Acquire and present outcomes can be scripted.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::graphics_device::{
    AcquireOutcome, Attachment, Buffer, BufferDesc, ClearValue, ColorSpace, CommandBuffer,
    CommandBufferLevel, CommandPool, DepthState, DynamicState, Extent2D, Fence, Framebuffer,
    FramebufferDesc, GraphicsDevice, ImageDesc, ImageView, IndexType, NativeSwapchain, Pipeline,
    PipelineCache, PipelineDesc, PresentMode, PresentOutcome, PrimitiveTopology, PushConstantRange, Queue,
    RasterizationState, Rect2D, RenderPass, RenderPassDesc, Semaphore, ShaderModuleDesc,
    ShaderStageFlags, SubmitInfo, SurfaceCapabilities, SurfaceFormat, SwapchainDesc,
    TextureFormat, VertexLayout, Viewport,
};

// ============================================================================
// Shared state
// ============================================================================

/// Owned summary of a `PipelineDesc`
#[derive(Debug, Clone)]
pub struct MockPipelineInfo {
    pub shaders: Vec<ShaderModuleDesc>,
    pub vertex_layout: VertexLayout,
    pub topology: PrimitiveTopology,
    pub rasterization: RasterizationState,
    pub sample_count: u32,
    pub color_attachment_count: u32,
    pub depth: Option<DepthState>,
    pub push_constant_ranges: Vec<PushConstantRange>,
    pub dynamic_states: Vec<DynamicState>,
}

#[derive(Default)]
pub struct MockState {
    /// Ordered call log
    pub events: Vec<String>,

    /// Scripted acquire results, consumed front first; round-robin success when empty
    pub acquire_script: VecDeque<Result<AcquireOutcome>>,
    /// Scripted present results, consumed front first; success when empty
    pub present_script: VecDeque<Result<PresentOutcome>>,
    /// Force the number of images of the next native swapchains
    pub native_image_count: Option<usize>,

    pub capabilities: Option<SurfaceCapabilities>,
    pub formats: Vec<SurfaceFormat>,
    pub present_modes: Vec<PresentMode>,

    pub swapchain_descs: Vec<SwapchainDesc>,
    pub render_pass_descs: Vec<RenderPassDesc>,
    pub pipeline_infos: Vec<MockPipelineInfo>,
    pub attachment_descs: Vec<ImageDesc>,
    pub viewports: Vec<Viewport>,
    pub scissors: Vec<Rect2D>,
    pub clear_values: Vec<Vec<ClearValue>>,
    pub push_constants: Vec<(ShaderStageFlags, u32, Vec<u8>)>,
    pub buffer_writes: Vec<(usize, Vec<u8>)>,

    pub live_swapchains: usize,
    pub live_framebuffers: usize,
    pub live_attachments: usize,

    next_swapchain: usize,
    next_semaphore: usize,
    next_fence: usize,
    next_command_buffer: usize,
    next_framebuffer: usize,
    next_attachment: usize,
    next_buffer: usize,
}

pub type SharedMockState = Arc<Mutex<MockState>>;

fn lock(state: &SharedMockState) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn log(state: &SharedMockState, event: String) {
    lock(state).events.push(event);
}

/// Default capabilities: 2..=4 images, fixed 800x600 surface
pub fn default_capabilities() -> SurfaceCapabilities {
    SurfaceCapabilities {
        min_image_count: 2,
        max_image_count: 4,
        current_extent: Extent2D::new(800, 600),
        min_image_extent: Extent2D::new(1, 1),
        max_image_extent: Extent2D::new(4096, 4096),
    }
}

pub fn bgra_srgb() -> SurfaceFormat {
    SurfaceFormat { format: TextureFormat::B8G8R8A8_SRGB, color_space: ColorSpace::SrgbNonLinear }
}

// ============================================================================
// Mock Semaphore / Fence
// ============================================================================

pub struct MockSemaphore {
    pub id: usize,
}

impl Semaphore for MockSemaphore {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn semaphore_id(semaphore: &dyn Semaphore) -> usize {
    semaphore.as_any().downcast_ref::<MockSemaphore>().map_or(usize::MAX, |s| s.id)
}

pub struct MockFence {
    pub id: usize,
    state: SharedMockState,
}

impl Fence for MockFence {
    fn wait(&self) -> Result<()> {
        log(&self.state, format!("fence[{}].wait", self.id));
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        log(&self.state, format!("fence[{}].reset", self.id));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockFence {
    fn drop(&mut self) {
        log(&self.state, format!("fence[{}].destroy", self.id));
    }
}

// ============================================================================
// Mock Queue
// ============================================================================

pub struct MockQueue {
    pub name: &'static str,
    pub family: u32,
    state: SharedMockState,
}

impl Queue for MockQueue {
    fn submit(&self, info: &SubmitInfo<'_>) -> Result<()> {
        let cmd = info
            .command_buffer
            .as_any()
            .downcast_ref::<MockCommandBuffer>()
            .map_or(usize::MAX, |c| c.id);
        let wait = info
            .wait_semaphore
            .map_or("none".to_string(), |(s, _)| format!("sem{}", semaphore_id(s)));
        let signal = info
            .signal_semaphore
            .map_or("none".to_string(), |s| format!("sem{}", semaphore_id(s)));
        let fence = info
            .fence
            .and_then(|f| f.as_any().downcast_ref::<MockFence>())
            .map_or("none".to_string(), |f| f.id.to_string());
        log(
            &self.state,
            format!("{}.submit(cmd={},wait={},signal={},fence={})", self.name, cmd, wait, signal, fence),
        );
        Ok(())
    }

    fn wait_idle(&self) -> Result<()> {
        log(&self.state, format!("{}.wait_idle", self.name));
        Ok(())
    }

    fn family_index(&self) -> u32 {
        self.family
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock image view / attachment
// ============================================================================

pub struct MockImageView {
    pub label: String,
    pub format: TextureFormat,
}

impl ImageView for MockImageView {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockAttachment {
    pub id: usize,
    pub desc: ImageDesc,
    view: MockImageView,
    state: SharedMockState,
}

impl Attachment for MockAttachment {
    fn image_view(&self) -> &dyn ImageView {
        &self.view
    }

    fn extent(&self) -> Extent2D {
        self.desc.extent
    }

    fn format(&self) -> TextureFormat {
        self.desc.format
    }
}

impl Drop for MockAttachment {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.live_attachments -= 1;
        state.events.push(format!("depth[{}].destroy", self.id));
    }
}

// ============================================================================
// Mock Native Swapchain
// ============================================================================

pub struct MockNativeSwapchain {
    pub generation: usize,
    views: Vec<MockImageView>,
    next_image: Mutex<usize>,
    state: SharedMockState,
}

impl NativeSwapchain for MockNativeSwapchain {
    fn image_count(&self) -> usize {
        self.views.len()
    }

    fn image_view(&self, index: usize) -> Option<&dyn ImageView> {
        self.views.get(index).map(|v| v as &dyn ImageView)
    }

    fn acquire_next_image(&self, signal: &dyn Semaphore) -> Result<AcquireOutcome> {
        let mut state = lock(&self.state);
        let outcome = match state.acquire_script.pop_front() {
            Some(scripted) => scripted,
            None => {
                let mut next = self.next_image.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let index = *next as u32;
                *next = (*next + 1) % self.views.len();
                Ok(AcquireOutcome::Success(index))
            }
        };
        state.events.push(format!(
            "swapchain[{}].acquire(sem{})->{}",
            self.generation,
            semaphore_id(signal),
            match &outcome {
                Ok(o) => format!("{:?}", o),
                Err(_) => "Err".to_string(),
            }
        ));
        outcome
    }

    fn present(&self, queue: &dyn Queue, wait: &dyn Semaphore, image_index: u32) -> Result<PresentOutcome> {
        let queue_name = queue.as_any().downcast_ref::<MockQueue>().map_or("?", |q| q.name);
        let mut state = lock(&self.state);
        let outcome = state.present_script.pop_front().unwrap_or(Ok(PresentOutcome::Success));
        state.events.push(format!(
            "swapchain[{}].present({},image={},wait=sem{})->{}",
            self.generation,
            queue_name,
            image_index,
            semaphore_id(wait),
            match &outcome {
                Ok(o) => format!("{:?}", o),
                Err(_) => "Err".to_string(),
            }
        ));
        outcome
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockNativeSwapchain {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.live_swapchains -= 1;
        state.events.push(format!("swapchain[{}].destroy", self.generation));
    }
}

// ============================================================================
// Mock RenderPass / Framebuffer / Pipeline / PipelineCache
// ============================================================================

pub struct MockRenderPass {
    pub desc: RenderPassDesc,
}

impl RenderPass for MockRenderPass {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockFramebuffer {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub attachments: Vec<String>,
    state: SharedMockState,
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockFramebuffer {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.live_framebuffers -= 1;
        state.events.push(format!("fb[{}].destroy", self.id));
    }
}

pub struct MockPipeline;

impl Pipeline for MockPipeline {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockPipelineCache;

impl PipelineCache for MockPipelineCache {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    pub id: usize,
    pub desc: BufferDesc,
    state: SharedMockState,
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.desc.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if !self.desc.usage.is_host_visible() {
            return Err(Error::InvalidResource(format!("buffer {} is not host-visible", self.id)));
        }
        if offset + data.len() as u64 > self.desc.size {
            return Err(Error::InvalidResource(format!(
                "write of {} bytes at {} exceeds buffer size {}",
                data.len(),
                offset,
                self.desc.size
            )));
        }
        lock(&self.state).buffer_writes.push((self.id, data.to_vec()));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        log(&self.state, format!("buffer[{}].destroy", self.id));
    }
}

pub fn buffer_id(buffer: &dyn Buffer) -> usize {
    buffer.as_any().downcast_ref::<MockBuffer>().map_or(usize::MAX, |b| b.id)
}

// ============================================================================
// Mock Command Pool / Command Buffer
// ============================================================================

pub struct MockCommandPool {
    state: SharedMockState,
}

impl CommandPool for MockCommandPool {
    fn allocate_command_buffer(&self, level: CommandBufferLevel) -> Result<Box<dyn CommandBuffer>> {
        let mut state = lock(&self.state);
        let id = state.next_command_buffer;
        state.next_command_buffer += 1;
        state.events.push(format!("cmd[{}].allocate({:?})", id, level));
        Ok(Box::new(MockCommandBuffer { id, state: Arc::clone(&self.state) }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockCommandBuffer {
    pub id: usize,
    state: SharedMockState,
}

impl MockCommandBuffer {
    fn log(&self, command: String) {
        log(&self.state, format!("cmd[{}].{}", self.id, command));
    }
}

impl CommandBuffer for MockCommandBuffer {
    fn reset(&mut self) -> Result<()> {
        self.log("reset".to_string());
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.log("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.log("end".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        _render_pass: &dyn RenderPass,
        framebuffer: &dyn Framebuffer,
        _render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        let fb = framebuffer.as_any().downcast_ref::<MockFramebuffer>().map_or(usize::MAX, |f| f.id);
        lock(&self.state).clear_values.push(clear_values.to_vec());
        self.log(format!("begin_render_pass(fb={})", fb));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.log("end_render_pass".to_string());
        Ok(())
    }

    fn bind_pipeline(&mut self, _pipeline: &dyn Pipeline) -> Result<()> {
        self.log("bind_pipeline".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        lock(&self.state).viewports.push(viewport);
        self.log("set_viewport".to_string());
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        lock(&self.state).scissors.push(scissor);
        self.log("set_scissor".to_string());
        Ok(())
    }

    fn copy_buffer(&mut self, src: &dyn Buffer, dst: &dyn Buffer, size: u64) -> Result<()> {
        self.log(format!("copy_buffer(src={},dst={},{})", buffer_id(src), buffer_id(dst), size));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &dyn Buffer, _offset: u64) -> Result<()> {
        self.log(format!("bind_vertex_buffer(buffer={})", buffer_id(buffer)));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &dyn Buffer, _offset: u64, index_type: IndexType) -> Result<()> {
        self.log(format!("bind_index_buffer(buffer={},{:?})", buffer_id(buffer), index_type));
        Ok(())
    }

    fn push_constants(
        &mut self,
        _pipeline: &dyn Pipeline,
        stages: ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) -> Result<()> {
        lock(&self.state).push_constants.push((stages, offset, data.to_vec()));
        self.log(format!("push_constants({})", data.len()));
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()> {
        self.log(format!(
            "draw_indexed({},{},{},{},{})",
            index_count, instance_count, first_index, vertex_offset, first_instance
        ));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Graphics Device
// ============================================================================

pub struct MockGraphicsDevice {
    pub state: SharedMockState,
    graphics_queue: Arc<MockQueue>,
    present_queue: Arc<MockQueue>,
}

impl MockGraphicsDevice {
    /// Device with `default_capabilities()`, one BGRA sRGB format and every present mode
    pub fn new() -> Self {
        let state: SharedMockState = Arc::new(Mutex::new(MockState {
            capabilities: Some(default_capabilities()),
            formats: vec![bgra_srgb()],
            present_modes: vec![
                PresentMode::Fifo,
                PresentMode::Immediate,
                PresentMode::Mailbox,
            ],
            ..Default::default()
        }));
        Self {
            graphics_queue: Arc::new(MockQueue { name: "graphics", family: 0, state: Arc::clone(&state) }),
            present_queue: Arc::new(MockQueue { name: "present", family: 0, state: Arc::clone(&state) }),
            state,
        }
    }

    pub fn with_capabilities(self, capabilities: SurfaceCapabilities) -> Self {
        lock(&self.state).capabilities = Some(capabilities);
        self
    }

    pub fn with_formats(self, formats: Vec<SurfaceFormat>) -> Self {
        lock(&self.state).formats = formats;
        self
    }

    pub fn with_present_modes(self, modes: Vec<PresentMode>) -> Self {
        lock(&self.state).present_modes = modes;
        self
    }

    pub fn script_acquire(&self, outcome: Result<AcquireOutcome>) {
        lock(&self.state).acquire_script.push_back(outcome);
    }

    pub fn script_present(&self, outcome: Result<PresentOutcome>) {
        lock(&self.state).present_script.push_back(outcome);
    }

    pub fn set_native_image_count(&self, count: Option<usize>) {
        lock(&self.state).native_image_count = count;
    }

    pub fn set_current_extent(&self, extent: Extent2D) {
        if let Some(caps) = lock(&self.state).capabilities.as_mut() {
            caps.current_extent = extent;
        }
    }

    pub fn events(&self) -> Vec<String> {
        lock(&self.state).events.clone()
    }

    pub fn clear_events(&self) {
        lock(&self.state).events.clear();
    }

    /// Index of the first event equal to `event`
    pub fn position(&self, event: &str) -> Option<usize> {
        lock(&self.state).events.iter().position(|e| e == event)
    }

    /// Number of events starting with `prefix`
    pub fn count_prefix(&self, prefix: &str) -> usize {
        lock(&self.state).events.iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn surface_capabilities(&self) -> Result<SurfaceCapabilities> {
        lock(&self.state)
            .capabilities
            .ok_or_else(|| Error::BackendError("surface lost".to_string()))
    }

    fn surface_formats(&self) -> Result<Vec<SurfaceFormat>> {
        Ok(lock(&self.state).formats.clone())
    }

    fn surface_present_modes(&self) -> Result<Vec<PresentMode>> {
        Ok(lock(&self.state).present_modes.clone())
    }

    fn create_native_swapchain(&self, desc: &SwapchainDesc) -> Result<Box<dyn NativeSwapchain>> {
        let mut state = lock(&self.state);
        let generation = state.next_swapchain;
        state.next_swapchain += 1;
        state.live_swapchains += 1;
        state.swapchain_descs.push(*desc);
        let count = state.native_image_count.unwrap_or(desc.image_count as usize);
        state.events.push(format!("swapchain[{}].create(images={})", generation, count));
        let views = (0..count)
            .map(|i| MockImageView {
                label: format!("swapchain[{}].view[{}]", generation, i),
                format: desc.format.format,
            })
            .collect();
        Ok(Box::new(MockNativeSwapchain {
            generation,
            views,
            next_image: Mutex::new(0),
            state: Arc::clone(&self.state),
        }))
    }

    fn create_semaphore(&self) -> Result<Box<dyn Semaphore>> {
        let mut state = lock(&self.state);
        let id = state.next_semaphore;
        state.next_semaphore += 1;
        Ok(Box::new(MockSemaphore { id }))
    }

    fn create_fence(&self, signaled: bool) -> Result<Box<dyn Fence>> {
        let mut state = lock(&self.state);
        let id = state.next_fence;
        state.next_fence += 1;
        state.events.push(format!("fence[{}].create(signaled={})", id, signaled));
        Ok(Box::new(MockFence { id, state: Arc::clone(&self.state) }))
    }

    fn create_command_pool(&self) -> Result<Arc<dyn CommandPool>> {
        log(&self.state, "command_pool.create".to_string());
        Ok(Arc::new(MockCommandPool { state: Arc::clone(&self.state) }))
    }

    fn create_pipeline_cache(&self) -> Result<Arc<dyn PipelineCache>> {
        log(&self.state, "pipeline_cache.create".to_string());
        Ok(Arc::new(MockPipelineCache))
    }

    fn create_attachment(&self, desc: &ImageDesc) -> Result<Box<dyn Attachment>> {
        let mut state = lock(&self.state);
        let id = state.next_attachment;
        state.next_attachment += 1;
        state.live_attachments += 1;
        state.attachment_descs.push(*desc);
        state.events.push(format!("depth[{}].create({}x{})", id, desc.extent.width, desc.extent.height));
        Ok(Box::new(MockAttachment {
            id,
            desc: *desc,
            view: MockImageView { label: format!("depth[{}]", id), format: desc.format },
            state: Arc::clone(&self.state),
        }))
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        let mut state = lock(&self.state);
        state.render_pass_descs.push(desc.clone());
        state.events.push("render_pass.create".to_string());
        Ok(Arc::new(MockRenderPass { desc: desc.clone() }))
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Box<dyn Framebuffer>> {
        let attachments: Vec<String> = desc
            .attachments
            .iter()
            .map(|view| {
                view.as_any()
                    .downcast_ref::<MockImageView>()
                    .map_or("?".to_string(), |v| v.label.clone())
            })
            .collect();
        let mut state = lock(&self.state);
        let id = state.next_framebuffer;
        state.next_framebuffer += 1;
        state.live_framebuffers += 1;
        state.events.push(format!("fb[{}].create({})", id, attachments.join(",")));
        Ok(Box::new(MockFramebuffer {
            id,
            width: desc.width,
            height: desc.height,
            attachments,
            state: Arc::clone(&self.state),
        }))
    }

    fn create_pipeline(&self, _cache: &dyn PipelineCache, desc: &PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        let mut state = lock(&self.state);
        state.pipeline_infos.push(MockPipelineInfo {
            shaders: desc.shaders.clone(),
            vertex_layout: desc.vertex_layout.clone(),
            topology: desc.topology,
            rasterization: desc.rasterization,
            sample_count: desc.sample_count,
            color_attachment_count: desc.color_attachment_count,
            depth: desc.depth,
            push_constant_ranges: desc.push_constant_ranges.clone(),
            dynamic_states: desc.dynamic_states.clone(),
        });
        state.events.push("pipeline.create".to_string());
        Ok(Arc::new(MockPipeline))
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>> {
        let mut state = lock(&self.state);
        let id = state.next_buffer;
        state.next_buffer += 1;
        state.events.push(format!("buffer[{}].create({:?},{})", id, desc.usage, desc.size));
        Ok(Arc::new(MockBuffer { id, desc: *desc, state: Arc::clone(&self.state) }))
    }

    fn graphics_queue(&self) -> Arc<dyn Queue> {
        Arc::clone(&self.graphics_queue) as Arc<dyn Queue>
    }

    fn present_queue(&self) -> Arc<dyn Queue> {
        Arc::clone(&self.present_queue) as Arc<dyn Queue>
    }

    fn wait_idle(&self) -> Result<()> {
        log(&self.state, "device.wait_idle".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
