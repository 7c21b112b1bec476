//! GPIO allocation and management
//!
//! Tracks which GPIO pins are in use to prevent conflicts.

use chronotap_core::config::{PinConfig, StopwatchConfig};
use heapless::FnvIndexSet;

use crate::adc::AdcChannel;
use crate::pins::PinError;

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// A config pin that could not be allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConflict {
    /// Config key the pin came from
    pub name: &'static str,
    pub pin: u8,
    pub error: PinError,
}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    /// Set of allocated GPIO pins
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    /// Create a new GPIO allocator
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Create an allocator with pins already claimed by fixed board wiring
    pub fn with_reserved(reserved: &[u8]) -> Self {
        let mut alloc = Self::new();
        for &pin in reserved {
            let _ = alloc.allocate(pin);
        }
        alloc
    }

    /// Allocate a GPIO pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), PinError> {
        if pin >= GPIO_COUNT as u8 {
            return Err(PinError::InvalidPin);
        }
        if self.allocated.contains(&pin) {
            return Err(PinError::AlreadyTaken);
        }
        self.allocated
            .insert(pin)
            .map_err(|_| PinError::InvalidPin)?;
        Ok(())
    }

    /// Claim every pin the config names, stopping at the first conflict
    ///
    /// LED pins are claimed even when the LED is disabled, since the
    /// init-failure blink still drives them.
    pub fn claim_config(&mut self, config: &StopwatchConfig) -> Result<(), PinConflict> {
        let pins = &config.pins;
        let mut claim = |name: &'static str, pin: &PinConfig| {
            self.allocate(pin.pin).map_err(|error| PinConflict {
                name,
                pin: pin.pin,
                error,
            })
        };

        claim("display_cs", &pins.display_cs)?;
        claim("display_dc", &pins.display_dc)?;
        claim("display_rst", &pins.display_rst)?;
        claim("backlight", &pins.backlight)?;
        claim("touch_cs", &pins.touch_cs)?;
        claim("light_sensor", &pins.light_sensor)?;
        claim("led.red", &config.led.red)?;
        claim("led.green", &config.led.green)?;
        claim("led.blue", &config.led.blue)?;

        if AdcChannel::from_gpio(pins.light_sensor.pin).is_none() {
            return Err(PinConflict {
                name: "light_sensor",
                pin: pins.light_sensor.pin,
                error: PinError::NotAdcCapable,
            });
        }
        Ok(())
    }
}
