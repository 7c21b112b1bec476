//! Touch controller trait

/// Errors from a touch controller read
///
/// All of these are transient: the sampler drops the poll and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Bus transfer failed
    Communication,
    /// Conversion returned an implausible value
    InvalidReading,
    /// Controller not initialized
    NotInitialized,
}

/// One raw reading in controller coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
    /// Contact pressure, larger is firmer
    pub pressure: u16,
}

/// Trait for resistive/capacitive touch controllers
pub trait TouchDriver {
    /// Configure the controller
    fn init(&mut self) -> Result<(), TouchError>;

    /// Read one sample
    ///
    /// Returns `Ok(None)` when nothing is touching the panel. Each call is a
    /// complete bus transaction.
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError>;
}
