//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chronotap-core and chronotap-display, written against the
//! `embedded-hal` 1.0 blocking traits:
//!
//! - ILI9341 TFT panel (SPI)
//! - XPT2046 resistive touch controller (SPI)
//! - RGB status LED (three GPIOs)
//! - Light-dependent resistor on an ADC channel
//!
//! The panel and touch controller share one SPI bus. Both take an
//! `SpiDevice`, which owns chip select and finishes each transaction before
//! returning, so their traffic never interleaves.

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod led;
pub mod sensor;
pub mod touch;

#[cfg(test)]
mod mock;
