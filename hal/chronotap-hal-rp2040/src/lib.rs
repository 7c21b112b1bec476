//! RP2040-specific HAL for the stopwatch firmware
//!
//! - Pin bank for taking GPIOs by number from the parsed config
//! - GPIO allocation to reject conflicting pin assignments
//! - ADC channel mapping for the light sensor

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;

pub use gpio::{GpioAllocator, PinConflict};
pub use pins::{BoardPeripherals, PinBank, PinError};
