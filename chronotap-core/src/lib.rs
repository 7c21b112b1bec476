//! Board-agnostic core logic for the stopwatch firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Wraparound-safe tick arithmetic
//! - Timing engine (run/pause accumulation)
//! - Touch debounce, calibration and hit-testing
//! - Stopwatch state machine
//! - Status LED mapping
//! - Dirty-region renderer
//! - Cooperative scheduler
//! - Configuration types and parser
//! - Hardware abstraction traits (touch, LED, light sensor, memory)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod led;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod time;
pub mod timing;
pub mod touch;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
