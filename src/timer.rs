/// Countdown used to rate-limit periodic behaviour (spawn intervals, fades).
///
/// A repeating timer keeps the overshoot of each period, but signals at most one
/// firing per [`Timer::update`] call. Call sites that must not lose firings after a
/// long frame loop on `update(0.0)` until it returns `false`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    duration: f32,
    position: f32,
    single_use: bool,
    finished: bool,
}

impl Timer {
    pub fn new(duration: f32, single_use: bool) -> Self {
        debug_assert!(duration > 0.0, "timer duration must be positive");
        Self {
            duration,
            position: 0.0,
            single_use,
            finished: false,
        }
    }

    pub fn repeating(duration: f32) -> Self {
        Self::new(duration, false)
    }

    pub fn once(duration: f32) -> Self {
        Self::new(duration, true)
    }

    /// Advances the timer, returns true when it fires during this call.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.finished {
            return false;
        }

        self.position += dt.max(0.0);

        if self.position < self.duration {
            return false;
        }

        if self.single_use {
            self.position = self.duration;
            self.finished = true;
        } else {
            self.position -= self.duration;
        }

        true
    }

    pub fn percent_complete(&self) -> f32 {
        self.position / self.duration
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Only ever true for single-use timers that already fired.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
