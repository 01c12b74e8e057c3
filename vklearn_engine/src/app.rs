//! Application hooks and the fixed-rate update timer
//!
//! The platform loop calls `AppLogic::input` every frame, `AppLogic::update`
//! whenever `UpdateTimer::tick` says an update is due, then renders.

use std::time::{Duration, Instant};
use crate::error::Result;
use crate::renderer::ForwardRenderer;
use crate::scene::Scene;
use crate::window::{MouseInput, WindowSize};

/// Game/demo logic driven by the platform loop
pub trait AppLogic {
    /// Load models and populate the scene
    fn init(&mut self, window: &WindowSize, scene: &mut Scene, renderer: &mut ForwardRenderer) -> Result<()>;

    /// Called once per frame after window events are processed
    fn input(&mut self, _window: &WindowSize, _scene: &mut Scene, _mouse: &MouseInput) {}

    /// Called at the configured update rate with the time since the previous update
    fn update(&mut self, elapsed: Duration, scene: &mut Scene);

    /// Called once before the renderer is dropped
    fn cleanup(&mut self) {}
}

/// Fixed-rate update accumulator
///
/// Each tick adds the elapsed time in units of one update period; at most
/// one update runs per tick, which consumes one unit.
#[derive(Debug, Clone)]
pub struct UpdateTimer {
    time_per_update: Duration,
    delta: f64,
    last_tick: Instant,
    last_update: Instant,
}

impl UpdateTimer {
    pub fn new(updates_per_second: u32) -> Self {
        Self::starting_at(updates_per_second, Instant::now())
    }

    pub fn starting_at(updates_per_second: u32, start: Instant) -> Self {
        Self {
            time_per_update: Duration::from_secs(1) / updates_per_second.max(1),
            delta: 0.0,
            last_tick: start,
            last_update: start,
        }
    }

    /// Advance to `now`; returns the time since the previous update when one is due
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.delta += elapsed.as_secs_f64() / self.time_per_update.as_secs_f64();

        if self.delta >= 1.0 {
            let since_update = now.saturating_duration_since(self.last_update);
            self.last_update = now;
            self.delta -= 1.0;
            Some(since_update)
        } else {
            None
        }
    }

    pub fn time_per_update(&self) -> Duration {
        self.time_per_update
    }
}
