//! Elapsed-time accounting
//!
//! Accumulates stopwatch time across run segments and formats it for display.

pub mod engine;
pub mod format;

pub use engine::{TimingEngine, TimingError};
pub use format::{format_elapsed, TimeFormat, TimeParts, TimeText};
