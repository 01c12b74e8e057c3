/// Unit tests for the ForwardRenderer frame state machine

use super::*;
use glam::Vec3;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{AcquireOutcome, Extent2D, PresentOutcome};
use crate::renderer::model::MeshData;
use crate::scene::Entity;

fn cube_like() -> ModelData {
    ModelData::new(
        "Tri",
        vec![MeshData {
            positions: vec![-0.5, -0.5, 0.0, 0.0, 0.5, 0.0, 0.5, -0.5, 0.0],
            texture_coords: vec![0.0, 1.0, 0.5, 0.0, 1.0, 1.0],
            indices: vec![0, 1, 2],
        }],
    )
}

struct Fixture {
    mock: Arc<MockGraphicsDevice>,
    window: WindowSize,
    scene: Scene,
    renderer: ForwardRenderer,
}

impl Fixture {
    fn new() -> Self {
        let mock = Arc::new(MockGraphicsDevice::new());
        let device: Arc<dyn GraphicsDevice> = mock.clone();
        let config = EngineConfig::default();
        let window = WindowSize::new(800, 600);
        let scene = Scene::new(&window, &config);
        let renderer = ForwardRenderer::new(device, &window, &config, &ForwardShaders::default(), None).unwrap();
        mock.clear_events();
        Self { mock, window, scene, renderer }
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.render(&mut self.window, &mut self.scene)
    }

    fn submits(&self) -> usize {
        self.mock.count_prefix("graphics.submit")
    }

    fn presents(&self) -> usize {
        self.mock.events().iter().filter(|e| e.contains(".present(")).count()
    }

    fn acquires(&self) -> usize {
        self.mock.events().iter().filter(|e| e.contains(".acquire(")).count()
    }
}

// ============================================================================
// Steady state
// ============================================================================

#[test]
fn test_frame_acquires_submits_presents_in_order() {
    let mut fixture = Fixture::new();
    fixture.render().unwrap();

    let acquire = fixture.mock.position("swapchain[0].acquire(sem0)->Success(0)").unwrap();
    let submit = fixture.mock.position("graphics.submit(cmd=0,wait=sem0,signal=sem1,fence=0)").unwrap();
    let present = fixture
        .mock
        .position("swapchain[0].present(present,image=0,wait=sem1)->Success")
        .unwrap();
    assert!(acquire < submit && submit < present);
    assert_eq!(fixture.mock.count_prefix("device.wait_idle"), 0);
    assert_eq!(fixture.renderer.swap_chain().unwrap().current_frame(), 1);
}

#[test]
fn test_zero_sized_window_skips_frame() {
    let mut fixture = Fixture::new();
    fixture.window.resize(0, 0);
    fixture.window.mark_clean();

    fixture.render().unwrap();

    assert_eq!(fixture.acquires(), 0);
    assert_eq!(fixture.submits(), 0);
    assert_eq!(fixture.presents(), 0);
}

#[test]
fn test_zero_width_window_skips_frame_even_when_dirty() {
    let mut fixture = Fixture::new();
    fixture.window.resize(0, 600);

    fixture.render().unwrap();

    assert!(fixture.mock.events().is_empty());
    assert!(fixture.window.is_dirty());
}

#[test]
fn test_loaded_models_are_drawn() {
    let mut fixture = Fixture::new();
    fixture.renderer.load_models(&[cube_like()]).unwrap();
    fixture.scene.add_entity(Entity::new("tri", "Tri", Vec3::new(0.0, 0.0, -2.0)));

    fixture.render().unwrap();

    assert_eq!(fixture.renderer.models().len(), 1);
    assert_eq!(fixture.mock.count_prefix("cmd[0].draw_indexed(3,1,0,0,0)"), 1);
}

// ============================================================================
// Resize protocol
// ============================================================================

#[test]
fn test_dirty_window_rebuilds_before_any_submission() {
    let mut fixture = Fixture::new();
    fixture.mock.set_current_extent(Extent2D::new(1024, 768));
    fixture.window.resize(1024, 768);

    fixture.render().unwrap();

    let device_idle = fixture.mock.position("device.wait_idle").unwrap();
    let queue_idle = fixture.mock.position("graphics.wait_idle").unwrap();
    let destroyed = fixture.mock.position("swapchain[0].destroy").unwrap();
    let created = fixture.mock.position("swapchain[1].create(images=3)").unwrap();
    let acquired = fixture
        .mock
        .events()
        .iter()
        .position(|e| e.starts_with("swapchain[1].acquire"))
        .unwrap();
    let submitted = fixture.mock.events().iter().position(|e| e.starts_with("graphics.submit")).unwrap();

    assert!(device_idle < queue_idle);
    assert!(queue_idle < destroyed);
    assert!(destroyed < created);
    assert!(created < acquired);
    assert!(acquired < submitted);
    // the stale swapchain is never asked for an image
    assert!(!fixture.mock.events().iter().any(|e| e.starts_with("swapchain[0].acquire")));

    assert!(!fixture.window.is_dirty());
    assert_eq!(fixture.renderer.swap_chain().unwrap().extent(), Extent2D::new(1024, 768));
    assert_eq!(fixture.renderer.activity().extent(), Extent2D::new(1024, 768));
    let expected = glam::Mat4::perspective_rh(60f32.to_radians(), 1024.0 / 768.0, 1.0, 100.0);
    assert_eq!(*fixture.scene.projection().matrix(), expected);
}

#[test]
fn test_rebuild_releases_framebuffers_before_old_swapchain() {
    let mut fixture = Fixture::new();
    fixture.mock.set_current_extent(Extent2D::new(1024, 768));
    fixture.window.resize(1024, 768);

    fixture.render().unwrap();

    let swapchain_destroyed = fixture.mock.position("swapchain[0].destroy").unwrap();
    for image in 0..3 {
        let framebuffer = fixture.mock.position(&format!("fb[{}].destroy", image)).unwrap();
        assert!(framebuffer < swapchain_destroyed, "fb[{}] outlived its image view", image);
    }
    let depth = fixture.mock.position("depth[0].destroy").unwrap();
    assert!(fixture.mock.position("fb[2].destroy").unwrap() < depth);
    assert!(depth < swapchain_destroyed);
}

#[test]
fn test_clean_frame_after_rebuild_does_not_rebuild_again() {
    let mut fixture = Fixture::new();
    fixture.window.resize(1024, 768);
    fixture.render().unwrap();
    fixture.mock.clear_events();

    fixture.render().unwrap();

    assert_eq!(fixture.mock.count_prefix("device.wait_idle"), 0);
    assert_eq!(fixture.submits(), 1);
}

#[test]
fn test_out_of_date_acquire_rebuilds_and_retries() {
    let mut fixture = Fixture::new();
    fixture.mock.script_acquire(Ok(AcquireOutcome::OutOfDate));

    fixture.render().unwrap();

    let events = fixture.mock.events();
    assert_eq!(events[0], "swapchain[0].acquire(sem0)->OutOfDate");
    assert!(fixture.mock.position("swapchain[1].create(images=3)").is_some());
    assert!(events.iter().any(|e| e.starts_with("swapchain[1].acquire")));
    assert_eq!(fixture.submits(), 1);
    assert_eq!(fixture.presents(), 1);
    assert!(!fixture.window.is_dirty());
}

#[test]
fn test_suboptimal_acquire_renders_without_rebuild() {
    let mut fixture = Fixture::new();
    fixture.mock.script_acquire(Ok(AcquireOutcome::Suboptimal(0)));

    fixture.render().unwrap();

    assert_eq!(fixture.mock.count_prefix("device.wait_idle"), 0);
    assert_eq!(fixture.submits(), 1);
}

#[test]
fn test_still_out_of_date_after_rebuild_skips_frame() {
    let mut fixture = Fixture::new();
    fixture.mock.script_acquire(Ok(AcquireOutcome::OutOfDate));
    fixture.mock.script_acquire(Ok(AcquireOutcome::OutOfDate));

    fixture.render().unwrap();

    assert_eq!(fixture.acquires(), 2);
    assert_eq!(fixture.submits(), 0);
    assert_eq!(fixture.presents(), 0);
    assert!(fixture.window.is_dirty());

    // the next frame rebuilds again without asking the stale swapchain first
    fixture.mock.clear_events();
    fixture.render().unwrap();
    assert!(fixture.mock.position("swapchain[2].create(images=3)").is_some());
    assert_eq!(fixture.submits(), 1);
}

#[test]
fn test_out_of_date_present_defers_rebuild_to_next_frame() {
    let mut fixture = Fixture::new();
    fixture.mock.script_present(Ok(PresentOutcome::OutOfDate));

    fixture.render().unwrap();

    assert!(fixture.window.is_dirty());
    assert_eq!(fixture.mock.count_prefix("device.wait_idle"), 0);
    assert!(fixture.mock.position("swapchain[1].create(images=3)").is_none());

    fixture.render().unwrap();
    assert!(fixture.mock.position("swapchain[1].create(images=3)").is_some());
    assert!(!fixture.window.is_dirty());
}

#[test]
fn test_suboptimal_present_is_not_a_rebuild() {
    let mut fixture = Fixture::new();
    fixture.mock.script_present(Ok(PresentOutcome::Suboptimal));

    fixture.render().unwrap();

    assert!(!fixture.window.is_dirty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_native_acquire_error_is_fatal() {
    let mut fixture = Fixture::new();
    fixture.mock.script_acquire(Err(Error::BackendError("ERROR_DEVICE_LOST".to_string())));

    assert!(matches!(fixture.render(), Err(Error::BackendError(_))));
    assert_eq!(fixture.submits(), 0);
}

#[test]
fn test_new_rejects_zero_sized_window() {
    let device: Arc<dyn GraphicsDevice> = Arc::new(MockGraphicsDevice::new());
    let result = ForwardRenderer::new(
        device,
        &WindowSize::new(0, 0),
        &EngineConfig::default(),
        &ForwardShaders::default(),
        None,
    );
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_load_models_rejects_bad_mesh() {
    let mut fixture = Fixture::new();
    let mut model = cube_like();
    model.meshes[0].indices.push(9);
    assert!(fixture.renderer.load_models(&[model]).is_err());
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_drop_waits_idle_then_releases_children_before_swapchain() {
    let fixture = Fixture::new();
    let mock = Arc::clone(&fixture.mock);
    drop(fixture);

    let idle = mock.position("device.wait_idle").unwrap();
    let fence = mock.position("fence[0].destroy").unwrap();
    let framebuffer = mock.position("fb[0].destroy").unwrap();
    let swapchain = mock.position("swapchain[0].destroy").unwrap();
    assert!(idle < framebuffer);
    assert!(framebuffer < fence);
    assert!(fence < swapchain);

    let state = mock.state.lock().unwrap();
    assert_eq!(state.live_swapchains, 0);
    assert_eq!(state.live_framebuffers, 0);
    assert_eq!(state.live_attachments, 0);
}
