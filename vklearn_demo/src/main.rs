mod cube_demo;

use std::sync::Arc;
use std::time::Instant;
use vklearn_engine::vklearn::{AppLogic, EngineConfig, Error, Result, UpdateTimer, DEFAULT_CONFIG_FILE};
use vklearn_engine::vklearn::graphics::GraphicsDevice;
use vklearn_engine::vklearn::render::{ForwardRenderer, ForwardShaders, ShaderCompiler};
use vklearn_engine::vklearn::scene::Scene;
use vklearn_engine::vklearn::window::{MouseInput, WindowSize};
use vklearn_engine::{engine_error, engine_info, engine_warn};
use vklearn_engine_renderer_vulkan::VulkanGraphicsDevice;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::cube_demo::CubeDemo;

const TITLE: &str = "Vulkan book";
const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() {
    engine_info!("vklearn::demo", "Starting application");

    if let Err(e) = run() {
        engine_error!("vklearn::demo", "{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = EngineConfig::load(DEFAULT_CONFIG_FILE)?;

    let event_loop = EventLoop::new()
        .map_err(|e| Error::InitializationFailed(format!("Failed to create event loop: {}", e)))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = Application::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::BackendError(format!("Event loop failed: {}", e)))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Everything that exists only while the window does
struct Running {
    logic: CubeDemo,
    renderer: ForwardRenderer,
    scene: Scene,
    window_size: WindowSize,
    mouse: MouseInput,
    timer: UpdateTimer,
}

struct Application {
    config: EngineConfig,
    // Dropped before the window: the surface refers to it
    state: Option<Running>,
    window: Option<Window>,
    error: Option<Error>,
}

impl Application {
    fn new(config: EngineConfig) -> Self {
        Self { config, state: None, window: None, error: None }
    }

    fn start(&self, window: &Window) -> Result<Running> {
        let window_size = WindowSize::from(window.inner_size());
        let device: Arc<dyn GraphicsDevice> = Arc::new(VulkanGraphicsDevice::new(window, &self.config)?);

        let shaders = forward_shaders()?;
        let compiler = shader_compiler(&self.config)?;
        let mut renderer = ForwardRenderer::new(device, &window_size, &self.config, &shaders, compiler.as_deref())?;

        let mut scene = Scene::new(&window_size, &self.config);
        let mut logic = CubeDemo::new();
        logic.init(&window_size, &mut scene, &mut renderer)?;

        Ok(Running {
            logic,
            renderer,
            scene,
            window_size,
            mouse: MouseInput::new(),
            timer: UpdateTimer::new(self.config.ups),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        engine_error!("vklearn::demo", "{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

/// Forward shader sources, relative to the working directory
fn forward_shaders() -> Result<ForwardShaders> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::InitializationFailed(format!("Failed to read working directory: {}", e)))?;
    Ok(ForwardShaders::default().rooted_at(&cwd))
}

#[cfg(feature = "shader-recompile")]
fn shader_compiler(config: &EngineConfig) -> Result<Option<Box<dyn ShaderCompiler>>> {
    if !config.shader_recompilation {
        return Ok(None);
    }
    Ok(Some(Box::new(vklearn_engine_renderer_vulkan::ShadercCompiler::new()?)))
}

#[cfg(not(feature = "shader-recompile"))]
fn shader_compiler(_config: &EngineConfig) -> Result<Option<Box<dyn ShaderCompiler>>> {
    Ok(None)
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(WIDTH, HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(e) => {
                self.fail(event_loop, Error::InitializationFailed(format!("Failed to create window: {}", e)));
                return;
            }
        };

        match self.start(&window) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                self.window = Some(window);
                self.fail(event_loop, e);
                return;
            }
        }
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.mouse.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.window_size.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                state.mouse.input();
                state.logic.input(&state.window_size, &mut state.scene, &state.mouse);
                if let Some(elapsed) = state.timer.tick(Instant::now()) {
                    state.logic.update(elapsed, &mut state.scene);
                }

                if let Err(e) = state.renderer.render(&mut state.window_size, &mut state.scene) {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.logic.cleanup();
        }
        if let Err(e) = self.config.save(DEFAULT_CONFIG_FILE) {
            engine_warn!("vklearn::demo", "Could not save configuration: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use vklearn_engine::vklearn::render::spirv_path;

    #[test]
    fn test_shaders_resolve_against_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        let shaders = forward_shaders().unwrap();

        assert_eq!(shaders, ForwardShaders::default().rooted_at(&cwd));
        assert!(shaders.vertex.ends_with("resources/shaders/fwd_vertex.glsl"));
        assert!(shaders.fragment.ends_with("resources/shaders/fwd_fragment.glsl"));
    }

    #[test]
    fn test_renderer_loads_binaries_where_build_script_writes_them() {
        let shaders = ForwardShaders::default();
        assert_eq!(spirv_path(&shaders.vertex), Path::new("resources/shaders/fwd_vertex.glsl.spv"));
        assert_eq!(spirv_path(&shaders.fragment), Path::new("resources/shaders/fwd_fragment.glsl.spv"));
    }
}
