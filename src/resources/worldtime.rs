//! Simulation clock.
//!
//! [`WorldTime`] turns the raw wall-clock gap between two frames into the step
//! fed to actor updates. The raw gap is clamped to `max_delta` so a debugger
//! pause or a window drag does not produce one huge, unstable integration step.

/// Largest step handed to the simulation, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
    pub max_delta: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}

impl WorldTime {
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Advance by a raw frame gap (seconds). Returns the clamped, scaled step.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let clamped = raw_dt.clamp(0.0, self.max_delta);
        let scaled_dt = clamped * self.time_scale;
        self.elapsed += scaled_dt;
        self.delta = scaled_dt;
        self.frame_count += 1;
        scaled_dt
    }
}
