use std::time::{Duration, Instant};

pub struct TimeSystem {
    // Core
    pub game_time: Duration,
    last_update: Instant,

    // Constants
    frame_dt: Duration,
    max_dt: Duration,

    // Flags/States
    paused: bool,
}

impl TimeSystem {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            game_time: Duration::ZERO,
            last_update: now,
            frame_dt: Duration::from_micros(8_333), // 120 Hz
            max_dt: Duration::from_millis(100),
            paused: false,
        }
    }

    /// Advances the clock and returns the delta in seconds for this tick,
    /// or `None` while paused. Long stalls (window drag, breakpoint) are
    /// clamped so timers don't fire a burst of catch-up work.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let frame_dt = now.saturating_duration_since(self.last_update);
        self.last_update = now;

        if self.paused {
            return None;
        }

        let dt = frame_dt.min(self.max_dt);
        self.game_time += dt;

        Some(dt.as_secs_f32())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;

        if !self.paused {
            self.last_update = Instant::now();
        }
    }

    pub fn next_wakeup(&self) -> Instant {
        self.last_update + self.frame_dt
    }
}
