//! Touch input pipeline
//!
//! ```text
//! read_raw ─▶ pressure gate ─▶ calibration ─▶ debounce ─▶ hit-test ─▶ ButtonEvent
//! ```

pub mod calibration;
pub mod debounce;
pub mod regions;
pub mod sampler;

pub use calibration::Calibration;
pub use debounce::{Debounced, Debouncer};
pub use regions::{hit_test, ButtonRegion};
pub use sampler::{SampleFault, TouchSample, TouchSampler};
