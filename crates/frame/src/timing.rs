/// Frame times shorter than this are not turned into an FPS value.
pub const MIN_DISPLAY_DT: f32 = 1e-6;

/// Clock bookkeeping for one iteration of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTiming {
    previous_time: f64,
    delta_time: f32,
}

impl FrameTiming {
    pub fn new(start_time: f64) -> Self {
        Self {
            previous_time: start_time,
            delta_time: 0.0,
        }
    }

    /// Take a clock sample and return the seconds since the previous one.
    ///
    /// A clock that stands still or runs backwards yields 0.0; a non-finite
    /// sample is ignored entirely. The result is never negative.
    pub fn advance(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            self.delta_time = 0.0;
            return 0.0;
        }

        let dt = now - self.previous_time;
        self.previous_time = now;
        self.delta_time = if dt > 0.0 { dt as f32 } else { 0.0 };
        self.delta_time
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn previous_time(&self) -> f64 {
        self.previous_time
    }

    /// Frames per second implied by the last delta, if it is long enough to
    /// divide by.
    pub fn fps(&self) -> Option<f32> {
        (self.delta_time >= MIN_DISPLAY_DT).then(|| 1.0 / self.delta_time)
    }

    /// Window title text for the last frame, e.g. `FPS: 60.000000 | dt: 0.016667`.
    pub fn title(&self) -> Option<String> {
        self.fps()
            .map(|fps| format!("FPS: {fps:.6} | dt: {:.6}", self.delta_time))
    }
}
