//! Touch polling, from raw controller reads to button events

use crate::config::TouchConfig;
use crate::state::{ButtonEvent, ButtonId};
use crate::time::{Tick, TimeSource};
use crate::traits::{RawTouch, TouchDriver, TouchError};

use super::calibration::Calibration;
use super::debounce::{Debounced, Debouncer};
use super::regions::{hit_test, ButtonRegion};

/// One raw sample with the tick it was taken at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub x: u16,
    pub y: u16,
    pub pressure: u16,
    pub tick: Tick,
}

impl TouchSample {
    fn from_raw(raw: RawTouch, tick: Tick) -> Self {
        Self {
            x: raw.x,
            y: raw.y,
            pressure: raw.pressure,
            tick,
        }
    }
}

/// A poll that was dropped without touching debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFault {
    /// Controller read failed
    Transient(TouchError),
    /// Sample calibrated to a point off the screen
    OutOfRange,
}

/// Debounced, calibrated, hit-tested touch input
pub struct TouchSampler {
    calibration: Calibration,
    debouncer: Debouncer,
    min_pressure: u16,
    regions: [ButtonRegion; 2],
    /// Button under the confirmed press, `None` for presses outside all buttons
    pressed: Option<ButtonId>,
    last_sample: Option<TouchSample>,
}

impl TouchSampler {
    pub fn new(config: &TouchConfig, regions: [ButtonRegion; 2], width: u16, height: u16) -> Self {
        Self {
            calibration: Calibration::from_config(config, width, height),
            debouncer: Debouncer::new(
                config.press_samples,
                config.release_samples,
                config.tolerance_px,
            ),
            min_pressure: config.min_pressure,
            regions,
            pressed: None,
            last_sample: None,
        }
    }

    /// Most recent accepted raw sample
    pub fn last_sample(&self) -> Option<TouchSample> {
        self.last_sample
    }

    /// Poll the controller once
    ///
    /// Faulty polls return `Err` and leave debounce state exactly as it was.
    pub fn poll<T: TouchDriver, C: TimeSource>(
        &mut self,
        driver: &mut T,
        clock: &C,
    ) -> Result<Option<ButtonEvent>, SampleFault> {
        let raw = driver.read_raw().map_err(SampleFault::Transient)?;

        let point = match raw {
            Some(raw) if raw.pressure >= self.min_pressure => {
                let point = self
                    .calibration
                    .apply(raw)
                    .ok_or(SampleFault::OutOfRange)?;
                self.last_sample = Some(TouchSample::from_raw(raw, clock.now()));
                Some(point)
            }
            // Light contact counts as no touch
            _ => None,
        };

        Ok(match self.debouncer.feed(point) {
            Some(Debounced::Press { x, y }) => {
                self.pressed = hit_test(&self.regions, x, y);
                self.pressed.map(ButtonEvent::Pressed)
            }
            Some(Debounced::Release) => self.pressed.take().map(ButtonEvent::Released),
            None => None,
        })
    }
}
