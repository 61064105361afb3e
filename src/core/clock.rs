use std::time::{Duration, Instant};

/// Longest delta reported, so a window that was stalled (dragged,
/// minimized) does not fast-forward playback on the next redraw
pub const MAX_DELTA: Duration = Duration::from_millis(250);

/// Redraw clock - tracks delta time between ticks
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick, at most [`MAX_DELTA`]
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).min(MAX_DELTA);
        self.last_tick = now;
        delta.as_secs_f32()
    }

    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();

        assert!(delta >= 0.009 && delta <= MAX_DELTA.as_secs_f32());
    }

    #[test]
    fn clock_caps_delta() {
        let mut clock = Clock::new();
        clock.last_tick = Instant::now() - Duration::from_secs(5);
        assert_eq!(clock.tick(), MAX_DELTA.as_secs_f32());
    }
}
