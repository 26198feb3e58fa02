//! Transport time: the monotonic clock the engine stamps recordings
//! against and the player drives playback from.

use std::time::Instant;

/// Monotonic musical-time source with start/stop/cancel semantics.
///
/// `now` advances from construction regardless of the started state;
/// `start`/`stop` bound playback and `cancel_scheduled` drops any
/// pending triggers the clock may be holding.
pub trait Clock {
    /// Seconds since the clock was created. Monotonic.
    fn now(&self) -> f64;

    fn start(&mut self);

    fn stop(&mut self);

    /// Drop pending scheduled triggers. Idempotent.
    fn cancel_scheduled(&mut self);
}

/// Wall-clock transport backed by [`Instant`].
///
/// The player polls `now` and fires triggers itself, so this clock holds
/// no scheduled callbacks of its own; start/stop only track the running
/// flag for display.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
    running: bool,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn cancel_scheduled(&mut self) {}
}

/// Hand-driven clock for tests and offline rendering.
///
/// Time only moves when told to; start/stop/cancel calls are counted so
/// tests can assert on transport interactions.
#[derive(Debug, Default)]
pub struct ManualClock {
    time: f64,
    pub running: bool,
    pub starts: u32,
    pub stops: u32,
    pub cancels: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, time: f64) {
        debug_assert!(time >= self.time, "manual clock must not run backwards");
        self.time = time;
    }

    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time
    }

    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }

    fn cancel_scheduled(&mut self) {
        self.cancels += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn wall_clock_advances_while_stopped() {
        // Transport time runs from engine init, not from start()
        let clock = WallClock::new();
        assert!(!clock.is_running());
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(clock.now() > 0.0);
    }

    #[test]
    fn manual_clock_counts_transport_calls() {
        let mut clock = ManualClock::new();
        clock.advance(1.5);
        assert_eq!(clock.now(), 1.5);

        clock.start();
        clock.stop();
        clock.cancel_scheduled();
        assert_eq!((clock.starts, clock.stops, clock.cancels), (1, 1, 1));
        assert!(!clock.running);
    }
}
