/// Fixed rate timer - accumulates delta time and fires at a given Hz
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    interval: f32,
    accumulator: f32,
}

impl FixedHz {
    /// Create timer that fires at given frequency
    pub fn new(hz: f32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns true if should fire
    pub fn tick(&mut self, delta: f32) -> bool {
        self.steps(delta, 1) == 1
    }

    /// Update with delta, returns how many intervals elapsed (at most
    /// `max_steps`). Time beyond the cap is dropped so a stalled frame
    /// does not replay a burst of steps.
    pub fn steps(&mut self, delta: f32, max_steps: u32) -> u32 {
        self.accumulator += delta;
        let elapsed = (self.accumulator / self.interval) as u32;
        if elapsed > max_steps {
            self.accumulator = 0.0;
            max_steps
        } else {
            self.accumulator -= elapsed as f32 * self.interval;
            elapsed
        }
    }

    /// Drop accumulated time, e.g. when playback is paused
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of the current interval already elapsed
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_hz_fires_at_rate() {
        let mut timer = FixedHz::new(10.0);

        assert!(!timer.tick(0.06));
        assert!(timer.tick(0.06)); // 0.12s >= 0.1s
        assert!(!timer.tick(0.01));
    }

    #[test]
    fn steps_counts_whole_intervals() {
        let mut timer = FixedHz::new(10.0);
        assert_eq!(timer.steps(0.25, 10), 2);
        assert!((timer.alpha() - 0.5).abs() < 1e-4);
        assert_eq!(timer.steps(0.06, 10), 1);
    }

    #[test]
    fn steps_are_capped() {
        let mut timer = FixedHz::new(10.0);
        assert_eq!(timer.steps(5.0, 3), 3);
        assert_eq!(timer.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_accumulated_time() {
        let mut timer = FixedHz::new(10.0);
        timer.steps(0.09, 1);
        timer.reset();
        assert!(!timer.tick(0.05));
    }
}
