//! Input sources: what the frame loop can ask of the window/input backend.
//!
//! # Invariants
//! - The frame loop consumes logical keys, never platform key codes.
//! - A fresh cursor activation never produces a look delta.

pub mod mouse;
pub mod scripted;

pub use mouse::MouseState;
pub use scripted::ScriptedInput;

/// Logical keys the viewer reacts to. Backends map physical keys onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Quit,
}

impl Key {
    pub const MOVEMENT: [Key; 4] = [Key::Forward, Key::Backward, Key::Left, Key::Right];
}

/// Window and input backend as seen by the frame loop.
pub trait InputSource {
    /// Pump pending platform events. Event-driven backends may leave this empty.
    fn poll_events(&mut self) {}

    fn is_key_down(&self, key: Key) -> bool;

    /// Cursor position in screen pixels, y pointing down.
    fn cursor_position(&self) -> (f64, f64);

    /// True once a close was requested, by the user or by the loop itself.
    fn should_terminate(&self) -> bool;

    fn request_termination(&mut self);

    /// Monotonic clock reading in seconds.
    fn elapsed_time_seconds(&self) -> f64;

    /// Replace the window title. Headless sources ignore it.
    fn set_window_title(&mut self, _title: &str) {}
}
