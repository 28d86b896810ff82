use crate::{InputSource, Key};
use std::collections::HashSet;

/// Deterministic input source for headless runs and tests.
///
/// Time advances by a fixed step per polled frame: the clock starts at 0.0
/// and frame `n` (zero-based) reads `(n + 1) * step`. The cursor moves by a
/// constant velocity per frame. Termination is reported once the frame budget
/// is spent or a termination was requested.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    step: f64,
    frame_budget: Option<u64>,
    polled: u64,
    held: HashSet<Key>,
    quit_after: Option<u64>,
    cursor_start: (f64, f64),
    cursor_velocity: (f64, f64),
    terminate_requested: bool,
    title: Option<String>,
}

impl ScriptedInput {
    /// A source whose clock advances `step` seconds per frame, with no budget.
    pub fn new(step: f64) -> Self {
        Self {
            step,
            frame_budget: None,
            polled: 0,
            held: HashSet::new(),
            quit_after: None,
            cursor_start: (0.0, 0.0),
            cursor_velocity: (0.0, 0.0),
            terminate_requested: false,
            title: None,
        }
    }

    /// Report termination after `frames` polls.
    pub fn with_frames(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Hold `key` for the whole run.
    pub fn holding(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Press the quit key once `frames` frames have completed.
    pub fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Start the cursor at `start` and move it by `velocity` pixels per frame.
    pub fn with_cursor(mut self, start: (f64, f64), velocity: (f64, f64)) -> Self {
        self.cursor_start = start;
        self.cursor_velocity = velocity;
        self
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Number of frames polled so far.
    pub fn frames_polled(&self) -> u64 {
        self.polled
    }

    /// Last title set by the loop.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) {
        self.polled += 1;
    }

    fn is_key_down(&self, key: Key) -> bool {
        if key == Key::Quit {
            if let Some(n) = self.quit_after {
                if self.polled > n {
                    return true;
                }
            }
        }
        self.held.contains(&key)
    }

    fn cursor_position(&self) -> (f64, f64) {
        let n = self.polled as f64;
        (
            self.cursor_start.0 + self.cursor_velocity.0 * n,
            self.cursor_start.1 + self.cursor_velocity.1 * n,
        )
    }

    fn should_terminate(&self) -> bool {
        self.terminate_requested || self.frame_budget.is_some_and(|b| self.polled >= b)
    }

    fn request_termination(&mut self) {
        self.terminate_requested = true;
    }

    fn elapsed_time_seconds(&self) -> f64 {
        (self.polled + 1) as f64 * self.step
    }

    fn set_window_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }
}
