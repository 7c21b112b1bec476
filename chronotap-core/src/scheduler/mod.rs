//! Cooperative scheduler
//!
//! Each iteration: sample touch, advance the state machine, drive the LED,
//! render if due, reclaim memory every K iterations, then report how long
//! to sleep.

pub mod executor;

pub use executor::{FatalError, IterationReport, Peripherals, Scheduler, SessionSummary};
