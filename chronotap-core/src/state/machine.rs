//! State machine definition
//!
//! All LED and UI behavior is a function of the current state. The state
//! only changes through `transition`.

use super::events::{ButtonEvent, ButtonId};

/// Stopwatch states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopwatchState {
    /// Power-on state, elapsed time is zero
    #[default]
    Idle,
    /// Timer counting
    Running,
    /// Timer frozen, elapsed time kept
    Stopped,
}

/// Side effect a transition asks of the timing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    Start,
    Stop,
    Reset,
}

impl StopwatchState {
    /// Check if the timer is counting in this state
    pub fn is_running(&self) -> bool {
        matches!(self, StopwatchState::Running)
    }

    /// Status label shown on screen
    pub fn label(&self) -> &'static str {
        match self {
            StopwatchState::Idle => "Ready",
            StopwatchState::Running => "Running",
            StopwatchState::Stopped => "Stopped",
        }
    }

    /// Process an event and return the next state with its side effect
    ///
    /// This is the core state transition logic. Only presses are
    /// meaningful; releases and any pair not listed fall through unchanged.
    pub fn transition(self, event: ButtonEvent) -> (Self, Option<TimerAction>) {
        use ButtonEvent::Pressed;
        use ButtonId::*;
        use StopwatchState::*;

        match (self, event) {
            (Idle, Pressed(StartStop)) => (Running, Some(TimerAction::Start)),
            (Running, Pressed(StartStop)) => (Stopped, Some(TimerAction::Stop)),
            (Stopped, Pressed(StartStop)) => (Running, Some(TimerAction::Start)),

            (Idle, Pressed(Reset)) => (Idle, None),
            (Stopped, Pressed(Reset)) => (Idle, Some(TimerAction::Reset)),
            // Reset while counting is ignored; stop first
            (Running, Pressed(Reset)) => (Running, None),

            // Default: stay in current state
            _ => (self, None),
        }
    }
}
