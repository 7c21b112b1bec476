//! Light-dependent resistor on an ADC channel

use chronotap_core::traits::{LightSensor, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Largest 12-bit conversion
const ADC_MAX: u16 = 4095;

/// LDR voltage divider
///
/// Each level is the mean of `samples` back-to-back conversions, reported
/// on the raw 12-bit scale (0-4095).
pub struct LdrSensor<ADC> {
    adc: ADC,
    /// LDR on the low side of the divider: brighter reads lower
    inverted: bool,
    samples: u8,
}

impl<ADC> LdrSensor<ADC> {
    /// `samples` below 1 is raised to 1
    pub fn new(adc: ADC, inverted: bool, samples: u8) -> Self {
        Self {
            adc,
            inverted,
            samples: samples.max(1),
        }
    }
}

impl<ADC: AdcReader> LightSensor for LdrSensor<ADC> {
    fn read_level(&mut self) -> Result<u16, SensorError> {
        let mut sum: u32 = 0;
        for _ in 0..self.samples {
            let raw = self.adc.read().map_err(|_| SensorError::ConversionError)?;
            if raw > ADC_MAX {
                return Err(SensorError::OutOfRange);
            }
            sum += raw as u32;
        }
        let level = (sum / self.samples as u32) as u16;
        Ok(if self.inverted { ADC_MAX - level } else { level })
    }
}
