//! XPT2046 resistive touch controller over SPI
//!
//! Each read takes Z1, Z2, X and Y conversions in one transaction (chip
//! select held throughout), then powers the ADC down until the next poll.

use chronotap_core::traits::{RawTouch, TouchDriver, TouchError};
use embedded_hal::spi::{Operation, SpiDevice};

/// Control bytes: start bit, channel, 12-bit differential mode
mod ctrl {
    pub const Z1: u8 = 0xB1;
    pub const Z2: u8 = 0xC1;
    pub const X: u8 = 0xD1;
    /// Last conversion powers down between polls (PENIRQ enabled)
    pub const Y_POWER_DOWN: u8 = 0x90;
}

/// Full-scale 12-bit conversion
const ADC_MAX: u16 = 4095;

/// Pressure at or below this is treated as no contact
const NO_CONTACT: u16 = 20;

/// XPT2046 driver
pub struct Xpt2046<SPI> {
    spi: SPI,
    initialized: bool,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            initialized: false,
        }
    }

    /// 12-bit result from the two bytes clocked out after a control byte
    fn conversion(buf: &[u8; 3]) -> u16 {
        (u16::from_be_bytes([buf[1], buf[2]]) >> 3) & ADC_MAX
    }
}

impl<SPI: SpiDevice> TouchDriver for Xpt2046<SPI> {
    fn init(&mut self) -> Result<(), TouchError> {
        // One dummy conversion leaves the controller powered down, IRQ armed
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &[ctrl::Y_POWER_DOWN, 0, 0])
            .map_err(|_| TouchError::Communication)?;
        self.initialized = true;
        Ok(())
    }

    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError> {
        if !self.initialized {
            return Err(TouchError::NotInitialized);
        }

        let mut z1 = [0u8; 3];
        let mut z2 = [0u8; 3];
        let mut x = [0u8; 3];
        let mut y = [0u8; 3];
        self.spi
            .transaction(&mut [
                Operation::Transfer(&mut z1, &[ctrl::Z1, 0, 0]),
                Operation::Transfer(&mut z2, &[ctrl::Z2, 0, 0]),
                Operation::Transfer(&mut x, &[ctrl::X, 0, 0]),
                Operation::Transfer(&mut y, &[ctrl::Y_POWER_DOWN, 0, 0]),
            ])
            .map_err(|_| TouchError::Communication)?;

        let z1 = Self::conversion(&z1);
        let z2 = Self::conversion(&z2);
        let pressure = (z1 + ADC_MAX).saturating_sub(z2);
        if z1 == 0 || pressure <= NO_CONTACT {
            return Ok(None);
        }

        let x = Self::conversion(&x);
        let y = Self::conversion(&y);
        // A rail reading while pressed means a bad conversion
        if x == 0 || x == ADC_MAX || y == 0 || y == ADC_MAX {
            return Err(TouchError::InvalidReading);
        }

        Ok(Some(RawTouch { x, y, pressure }))
    }
}
