//! Ambient light sensor trait

/// Errors that can occur with light sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion error
    ConversionError,
    /// Reading out of expected range
    OutOfRange,
}

/// Trait for an analog light level source
pub trait LightSensor {
    /// Read the raw light level
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_level(&mut self) -> Result<u16, SensorError>;
}
