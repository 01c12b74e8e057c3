/// Mouse state fed from window events
///
/// `input()` is called once per frame and turns the cursor movement since
/// the previous frame into a displacement vector. The vector is laid out
/// for camera rotation: `x` carries the vertical delta, `y` the horizontal.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

#[derive(Debug, Clone)]
pub struct MouseInput {
    current_pos: Vec2,
    previous_pos: Vec2,
    displacement: Vec2,
    in_window: bool,
    left_button_pressed: bool,
    right_button_pressed: bool,
}

impl Default for MouseInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseInput {
    pub fn new() -> Self {
        Self {
            current_pos: Vec2::ZERO,
            previous_pos: Vec2::new(-1.0, -1.0),
            displacement: Vec2::ZERO,
            in_window: false,
            left_button_pressed: false,
            right_button_pressed: false,
        }
    }

    /// Feed a window event; events unrelated to the mouse are ignored
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorEntered { .. } => self.in_window = true,
            WindowEvent::CursorLeft { .. } => self.in_window = false,
            WindowEvent::MouseInput { state, button, .. } => {
                self.button_changed(*button, *state == ElementState::Pressed);
            }
            _ => {}
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.current_pos = Vec2::new(x, y);
    }

    pub fn set_in_window(&mut self, in_window: bool) {
        self.in_window = in_window;
    }

    pub fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left_button_pressed = pressed,
            MouseButton::Right => self.right_button_pressed = pressed,
            _ => {}
        }
    }

    /// Per-frame update of the displacement vector
    pub fn input(&mut self) {
        self.displacement = Vec2::ZERO;
        if self.previous_pos.x > 0.0 && self.previous_pos.y > 0.0 && self.in_window {
            let delta = self.current_pos - self.previous_pos;
            self.displacement = Vec2::new(delta.y, delta.x);
        }
        self.previous_pos = self.current_pos;
    }

    pub fn current_pos(&self) -> Vec2 {
        self.current_pos
    }

    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    pub fn is_in_window(&self) -> bool {
        self.in_window
    }

    pub fn is_left_button_pressed(&self) -> bool {
        self.left_button_pressed
    }

    pub fn is_right_button_pressed(&self) -> bool {
        self.right_button_pressed
    }
}

#[cfg(test)]
#[path = "mouse_input_tests.rs"]
mod tests;
