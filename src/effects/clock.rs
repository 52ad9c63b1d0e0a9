use std::time::{Duration, Instant};

/// Monotonic clock driving the `time` uniform
#[derive(Debug, Clone, Copy)]
pub struct EffectClock {
    start: Instant,
}

impl Default for EffectClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds at millisecond resolution
    pub fn seconds(&self) -> f32 {
        self.elapsed().as_millis() as f32 * 0.001
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_restart() {
        let mut clock = EffectClock::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.seconds() >= 0.02);
        clock.restart();
        assert!(clock.seconds() < 0.02);
    }
}
