//! Run/pause time accumulation
//!
//! The engine holds no clock of its own: every operation that needs the
//! current time takes a `TimeSource`, so tests drive it with a mock counter
//! and the firmware with the hardware one.

use crate::time::{Tick, TimeSource};

/// Errors from the timing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Reset requested while a segment is active
    ResetWhileRunning,
}

/// Accumulates elapsed milliseconds across run segments
///
/// At most one segment is active at a time. `accumulated_ms` holds the sum of
/// all closed segments (and any checkpointed part of the open one);
/// `running_since` marks where the open segment resumes counting.
///
/// Operating assumption: while running, `stop` or `checkpoint` is called at
/// least once per counter period (~49.7 days). Between two such calls the
/// open segment is measured with a single wraparound-safe difference, which
/// cannot represent more than one period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingEngine {
    accumulated_ms: u64,
    running_since: Option<Tick>,
    /// Part of the current lap already folded into `accumulated_ms` by checkpoints
    lap_folded_ms: u64,
}

impl TimingEngine {
    /// Create a stopped engine at zero
    pub const fn new() -> Self {
        Self {
            accumulated_ms: 0,
            running_since: None,
            lap_folded_ms: 0,
        }
    }

    /// Check if a segment is open
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Open a segment at the current tick
    ///
    /// No-op if already running.
    pub fn start<C: TimeSource>(&mut self, clock: &C) {
        if self.running_since.is_none() {
            self.running_since = Some(clock.now());
            self.lap_folded_ms = 0;
        }
    }

    /// Close the open segment and add it to the total
    ///
    /// No-op if not running.
    pub fn stop<C: TimeSource>(&mut self, clock: &C) {
        if let Some(since) = self.running_since.take() {
            self.accumulated_ms += clock.elapsed_since(since) as u64;
            self.lap_folded_ms = 0;
        }
    }

    /// Zero the total
    ///
    /// Refused while running; the caller must stop first.
    pub fn reset(&mut self) -> Result<(), TimingError> {
        if self.is_running() {
            return Err(TimingError::ResetWhileRunning);
        }
        self.accumulated_ms = 0;
        Ok(())
    }

    /// Total elapsed milliseconds, including the open segment
    pub fn elapsed<C: TimeSource>(&self, clock: &C) -> u64 {
        match self.running_since {
            Some(since) => self.accumulated_ms + clock.elapsed_since(since) as u64,
            None => self.accumulated_ms,
        }
    }

    /// Fold the open segment's progress into the total and re-mark it
    ///
    /// Called once per scheduler iteration so the open segment never spans
    /// more than one iteration's worth of ticks.
    pub fn checkpoint<C: TimeSource>(&mut self, clock: &C) {
        if let Some(since) = self.running_since {
            let now = clock.now();
            let delta = now.wrapping_since(since) as u64;
            self.accumulated_ms += delta;
            self.lap_folded_ms += delta;
            self.running_since = Some(now);
        }
    }

    /// Milliseconds since the last start/resume, zero when stopped
    pub fn lap<C: TimeSource>(&self, clock: &C) -> u64 {
        match self.running_since {
            Some(since) => self.lap_folded_ms + clock.elapsed_since(since) as u64,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;
    use proptest::prelude::*;

    #[test]
    fn test_new_engine_is_zero_and_stopped() {
        let clock = MockClock::new(1234);
        let engine = TimingEngine::new();
        assert!(!engine.is_running());
        assert_eq!(engine.elapsed(&clock), 0);
    }

    #[test]
    fn test_start_stop_accumulates() {
        let clock = MockClock::new(1000);
        let mut engine = TimingEngine::new();

        engine.start(&clock);
        clock.advance(1500);
        engine.stop(&clock);
        assert_eq!(engine.elapsed(&clock), 1500);

        // Frozen while stopped
        clock.advance(10_000);
        assert_eq!(engine.elapsed(&clock), 1500);

        // Second segment adds on
        engine.start(&clock);
        clock.advance(250);
        assert_eq!(engine.elapsed(&clock), 1750);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);
        clock.advance(100);
        engine.start(&clock);
        clock.advance(100);
        assert_eq!(engine.elapsed(&clock), 200);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.stop(&clock);
        assert_eq!(engine.elapsed(&clock), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_reset_refused_while_running() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);
        clock.advance(40);
        assert_eq!(engine.reset(), Err(TimingError::ResetWhileRunning));
        assert_eq!(engine.elapsed(&clock), 40);
        assert!(engine.is_running());
    }

    #[test]
    fn test_reset_zeroes_after_stop() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);
        clock.advance(900);
        engine.stop(&clock);
        assert_eq!(engine.reset(), Ok(()));
        assert_eq!(engine.elapsed(&clock), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_elapsed_across_counter_wrap() {
        let clock = MockClock::new(0xFFFF_FFF0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);
        clock.advance(0x20);
        assert_eq!(clock.now(), Tick(0x10));
        assert_eq!(engine.elapsed(&clock), 0x20);
    }

    #[test]
    fn test_checkpoint_survives_multiple_wraps() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);

        // Three full counter periods in quarter-period steps
        let step = 1u32 << 30;
        for _ in 0..12 {
            clock.advance(step);
            engine.checkpoint(&clock);
        }
        clock.advance(5);
        assert_eq!(engine.elapsed(&clock), 3 * (1u64 << 32) + 5);
    }

    #[test]
    fn test_lap_tracks_current_segment() {
        let clock = MockClock::new(0);
        let mut engine = TimingEngine::new();
        engine.start(&clock);
        clock.advance(300);
        engine.stop(&clock);
        assert_eq!(engine.lap(&clock), 0);

        engine.start(&clock);
        clock.advance(120);
        engine.checkpoint(&clock);
        clock.advance(30);
        assert_eq!(engine.lap(&clock), 150);
        assert_eq!(engine.elapsed(&clock), 450);
    }

    proptest! {
        #[test]
        fn prop_elapsed_non_decreasing_while_running(
            start in any::<u32>(),
            steps in proptest::collection::vec((0u32..5_000, any::<bool>()), 1..64),
        ) {
            let clock = MockClock::new(start);
            let mut engine = TimingEngine::new();
            engine.start(&clock);
            let mut last = engine.elapsed(&clock);
            for (delta, checkpoint) in steps {
                clock.advance(delta);
                if checkpoint {
                    engine.checkpoint(&clock);
                } else {
                    engine.start(&clock);
                }
                let now = engine.elapsed(&clock);
                prop_assert!(now >= last);
                last = now;
            }
        }

        #[test]
        fn prop_reset_always_zeroes(start in any::<u32>(), run in 0u32..1_000_000) {
            let clock = MockClock::new(start);
            let mut engine = TimingEngine::new();
            engine.start(&clock);
            clock.advance(run);
            engine.stop(&clock);
            prop_assert_eq!(engine.reset(), Ok(()));
            prop_assert_eq!(engine.elapsed(&clock), 0);
            prop_assert!(!engine.is_running());
        }
    }
}
