use pyramid_input::{InputSource, Key};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use winit::keyboard::KeyCode;
use winit::window::Window;

/// Physical key bound to each logical key.
fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Forward => KeyCode::KeyW,
        Key::Backward => KeyCode::KeyS,
        Key::Left => KeyCode::KeyA,
        Key::Right => KeyCode::KeyD,
        Key::Quit => KeyCode::Escape,
    }
}

/// `InputSource` fed by winit events.
///
/// While the cursor is captured the OS cursor does not move, so raw mouse
/// motion is accumulated into a virtual cursor position instead.
pub struct WinitInput {
    keys_held: HashSet<KeyCode>,
    cursor: (f64, f64),
    close_requested: bool,
    clock: Instant,
    window: Option<Arc<Window>>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            cursor: (0.0, 0.0),
            close_requested: false,
            clock: Instant::now(),
            window: None,
        }
    }

    /// Window whose title receives the frame-rate display.
    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.cursor.0 += dx;
        self.cursor.1 += dy;
    }

    /// Forget held keys, e.g. when focus is lost and releases will not arrive.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }
}

impl Default for WinitInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for WinitInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys_held.contains(&key_code(key))
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    fn should_terminate(&self) -> bool {
        self.close_requested
    }

    fn request_termination(&mut self) {
        self.close_requested = true;
    }

    fn elapsed_time_seconds(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(window) = &self.window {
            window.set_title(title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_escape_bindings() {
        let mut input = WinitInput::new();
        input.handle_key(KeyCode::KeyW, true);
        input.handle_key(KeyCode::Escape, true);
        assert!(input.is_key_down(Key::Forward));
        assert!(input.is_key_down(Key::Quit));
        assert!(!input.is_key_down(Key::Left));

        input.handle_key(KeyCode::KeyW, false);
        assert!(!input.is_key_down(Key::Forward));
    }

    #[test]
    fn motion_accumulates_into_virtual_cursor() {
        let mut input = WinitInput::new();
        input.add_mouse_motion(3.0, -1.0);
        input.add_mouse_motion(2.0, 4.0);
        assert_eq!(input.cursor_position(), (5.0, 3.0));
    }

    #[test]
    fn release_all_clears_keys() {
        let mut input = WinitInput::new();
        input.handle_key(KeyCode::KeyD, true);
        input.release_all();
        assert!(!input.is_key_down(Key::Right));
    }

    #[test]
    fn termination_is_sticky() {
        let mut input = WinitInput::new();
        assert!(!input.should_terminate());
        input.request_termination();
        assert!(input.should_terminate());
    }
}
