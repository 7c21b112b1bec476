//! Sensor drivers

pub mod light;

pub use light::{AdcReader, LdrSensor};
