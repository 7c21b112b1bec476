//! Stopwatch controller
//!
//! Owns the state and the timing engine, and applies the action each
//! transition asks for.

use crate::time::TimeSource;
use crate::timing::TimingEngine;

use super::events::ButtonEvent;
use super::machine::{StopwatchState, TimerAction};

/// State plus accumulated time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    state: StopwatchState,
    engine: TimingEngine,
}

impl Stopwatch {
    /// Create an idle stopwatch at zero
    pub const fn new() -> Self {
        Self {
            state: StopwatchState::Idle,
            engine: TimingEngine::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> StopwatchState {
        self.state
    }

    /// Apply a button event
    ///
    /// Returns the new state if the event caused a transition.
    pub fn handle<C: TimeSource>(
        &mut self,
        event: ButtonEvent,
        clock: &C,
    ) -> Option<StopwatchState> {
        let (next, action) = self.state.transition(event);

        match action {
            Some(TimerAction::Start) => self.engine.start(clock),
            Some(TimerAction::Stop) => self.engine.stop(clock),
            Some(TimerAction::Reset) => {
                // The table only resets from Stopped, where the engine is closed
                if self.engine.reset().is_err() {
                    return None;
                }
            }
            None => {}
        }

        if next != self.state {
            self.state = next;
            Some(next)
        } else {
            None
        }
    }

    /// Fold the running segment into the total
    pub fn checkpoint<C: TimeSource>(&mut self, clock: &C) {
        self.engine.checkpoint(clock);
    }

    /// Total elapsed milliseconds
    pub fn elapsed<C: TimeSource>(&self, clock: &C) -> u64 {
        self.engine.elapsed(clock)
    }

    /// Milliseconds since the last start or resume, zero unless running
    pub fn lap<C: TimeSource>(&self, clock: &C) -> u64 {
        self.engine.lap(clock)
    }
}
