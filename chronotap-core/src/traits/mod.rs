//! Hardware abstraction traits
//!
//! These traits define the interface between the stopwatch logic and
//! board-specific implementations. The display side lives in
//! `chronotap-display` and is re-exported here.

pub mod led;
pub mod memory;
pub mod sensor;
pub mod touch;

pub use chronotap_display::{DisplayBackend, DisplayError};
pub use led::{LedColor, StatusLed};
pub use memory::{HeapStatus, MemoryReclaimer};
pub use sensor::{LightSensor, SensorError};
pub use touch::{RawTouch, TouchDriver, TouchError};
