use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixels of touchpad scroll treated as one wheel notch
const PIXELS_PER_LINE: f32 = 40.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Buttons that went down since the last reset, in order
    just_pressed: Vec<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Wheel lines since last reset, positive away from the user
    scroll_delta: f32,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_state(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_state(btn, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor((position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Process an event the UI already consumed. Presses and motion are
    /// dropped, releases still land so a drag ending over the UI does not
    /// leave its button held.
    pub fn process_consumed_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_consumed_state(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_consumed_state(btn, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, new_pos: (f32, f32)) {
        if let Some(old_pos) = self.mouse_position {
            self.mouse_delta.0 += new_pos.0 - old_pos.0;
            self.mouse_delta.1 += new_pos.1 - old_pos.1;
        }
        self.mouse_position = Some(new_pos);
    }

    fn set_consumed_state(&mut self, button: Button, state: ElementState) {
        if state == ElementState::Released {
            self.set_state(button, state);
        }
    }

    fn set_state(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                    self.just_pressed.push(button);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
        }
    }

    /// Forget held buttons, e.g. when the window loses focus mid-drag
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.pressed_vec.clear();
    }

    /// Reset per-frame state (deltas and edge presses)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
        self.just_pressed.clear();
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn just_pressed(&self) -> &[Button] {
        &self.just_pressed
    }

    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowLeft => Some(Button::ArrowLeft),
            KeyCode::ArrowRight => Some(Button::ArrowRight),
            KeyCode::Space => Some(Button::Space),
            KeyCode::KeyF => Some(Button::KeyF),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
