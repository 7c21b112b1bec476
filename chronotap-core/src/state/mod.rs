//! Stopwatch state machine
//!
//! The state machine is explicit, finite and deterministic. Button events
//! are the only input; timing-engine calls are the only side effect.

pub mod events;
pub mod machine;
pub mod stopwatch;

pub use events::{ButtonEvent, ButtonId};
pub use machine::{StopwatchState, TimerAction};
pub use stopwatch::Stopwatch;
