/// Fixed-rate tick scheduling on top of a variable frame rate.
///
/// The host calls `advance` once per frame with the frame's delta. At most
/// one tick is due per frame; when it fires the leftover time is dropped,
/// so a slow frame never produces a burst of catch-up ticks.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TickScheduler {
    interval: Duration,
    since_tick: Duration,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        TickScheduler { interval, since_tick: Duration::ZERO }
    }

    /// Accumulate `delta`; true when a tick is due.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.since_tick += delta;
        if self.since_tick >= self.interval {
            self.since_tick = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Start a fresh interval (game start, resume from pause).
    pub fn reset(&mut self) {
        self.since_tick = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn ticks_once_per_interval() {
        let mut s = TickScheduler::new(ms(120));
        let fired: Vec<bool> = (0..16).map(|_| s.advance(ms(16))).collect();
        // 16ms frames: due on the 8th frame (128ms), then again 8 frames later.
        assert_eq!(fired.iter().filter(|&&f| f).count(), 2);
        assert!(fired[7]);
        assert!(fired[15]);
    }

    #[test]
    fn slow_frame_yields_a_single_tick() {
        let mut s = TickScheduler::new(ms(120));
        assert!(s.advance(ms(1000)));
        assert!(!s.advance(ms(1)));
    }

    #[test]
    fn reset_restarts_the_interval() {
        let mut s = TickScheduler::new(ms(120));
        assert!(!s.advance(ms(100)));
        s.reset();
        assert!(!s.advance(ms(100)));
        assert!(s.advance(ms(20)));
    }
}
