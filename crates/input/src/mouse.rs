/// Tracks the previous cursor sample so the loop can turn absolute positions
/// into per-frame look deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseState {
    pub previous_x: f64,
    pub previous_y: f64,
    pub first_frame: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            previous_x: 0.0,
            previous_y: 0.0,
            first_frame: true,
        }
    }
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous sample, e.g. after the cursor was recaptured.
    /// The next `sample` seeds instead of producing a delta.
    pub fn reset(&mut self) {
        self.first_frame = true;
    }

    /// Record a cursor sample and return the look delta `(dx, dy)` in pixels.
    ///
    /// `dx` grows to the right and `dy` grows upward (screen y is inverted).
    /// The first sample after creation or `reset` only seeds the state and
    /// returns `None`.
    pub fn sample(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        if self.first_frame {
            self.previous_x = x;
            self.previous_y = y;
            self.first_frame = false;
            tracing::trace!(x, y, "seeded cursor");
            return None;
        }

        let dx = x - self.previous_x;
        let dy = self.previous_y - y;
        self.previous_x = x;
        self.previous_y = y;
        Some((dx as f32, dy as f32))
    }
}
