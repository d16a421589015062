use tracing::{debug, info};

pub const DEFAULT_SPEED_STEP: f32 = 0.1;

/// Animation time base and the global playback controls.
///
/// Lives in the driver and gets handed by reference to whatever handles
/// input, so nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    // Seconds, from whatever monotonic clock the frontend reads
    last_update: f64,
    current: f64,
    playing: bool,
    speed: f32,
    speed_step: f32,
    reset_pending: bool,
}

impl SimulationState {
    pub fn new(start_time: f64) -> Self {
        Self::with_settings(start_time, 1.0, DEFAULT_SPEED_STEP, true)
    }

    /// Negative (or NaN) speed and step are treated as zero.
    pub fn with_settings(start_time: f64, speed: f32, speed_step: f32, playing: bool) -> Self {
        SimulationState {
            last_update: start_time,
            current: start_time,
            playing,
            speed: speed.max(0.0),
            speed_step: speed_step.max(0.0),
            reset_pending: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn current_time(&self) -> f64 {
        self.current
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
        info!(playing = self.playing, "Toggled animation");
    }

    // Speed changes only take while playing.
    // TODO: decide whether the speed keys should also work while paused.

    pub fn speed_up(&mut self) {
        if !self.playing {
            return;
        }
        self.speed += self.speed_step;
        debug!(speed = self.speed, "Speed up");
    }

    pub fn slow_down(&mut self) {
        if !self.playing {
            return;
        }
        self.speed = f32::max(0.0, self.speed - self.speed_step);
        debug!(speed = self.speed, "Slow down");
    }

    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Clears the reset flag, returning whether it was set.
    pub fn take_reset(&mut self) -> bool {
        std::mem::replace(&mut self.reset_pending, false)
    }

    /// Records the time for a new frame and returns how many seconds passed
    /// since the previous one. This runs whether or not we're playing, so that
    /// unpausing doesn't make everything jump ahead by the length of the
    /// pause. A clock that runs backwards gives zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        self.current = now;
        let elapsed = f64::max(self.current - self.last_update, 0.0);
        self.last_update = self.current;
        elapsed as f32
    }
}
