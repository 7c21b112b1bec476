//! Raw-to-screen coordinate mapping

use crate::config::TouchConfig;
use crate::traits::RawTouch;

/// Fixed affine map from controller coordinates to screen pixels
///
/// `raw_x_*` bound the controller value that lands on the screen's X axis
/// after any axis swap, and likewise for Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    raw_x_min: u16,
    raw_x_max: u16,
    raw_y_min: u16,
    raw_y_max: u16,
    swap_xy: bool,
    invert_x: bool,
    invert_y: bool,
    width: u16,
    height: u16,
}

impl Calibration {
    /// Build from the touch config for a `width` x `height` screen
    pub fn from_config(config: &TouchConfig, width: u16, height: u16) -> Self {
        Self {
            raw_x_min: config.raw_x_min,
            raw_x_max: config.raw_x_max,
            raw_y_min: config.raw_y_min,
            raw_y_max: config.raw_y_max,
            swap_xy: config.swap_xy,
            invert_x: config.invert_x,
            invert_y: config.invert_y,
            width,
            height,
        }
    }

    /// Map a raw sample to screen coordinates
    ///
    /// Returns `None` when the sample falls outside the calibrated area.
    pub fn apply(&self, raw: RawTouch) -> Option<(u16, u16)> {
        let (rx, ry) = if self.swap_xy {
            (raw.y, raw.x)
        } else {
            (raw.x, raw.y)
        };

        let x = scale(rx, self.raw_x_min, self.raw_x_max, self.width)?;
        let y = scale(ry, self.raw_y_min, self.raw_y_max, self.height)?;

        let x = if self.invert_x { self.width - 1 - x } else { x };
        let y = if self.invert_y { self.height - 1 - y } else { y };
        Some((x, y))
    }
}

/// Linear map of `[min, max]` onto `[0, span)`
fn scale(value: u16, min: u16, max: u16, span: u16) -> Option<u16> {
    if value < min || value > max || max <= min || span == 0 {
        return None;
    }
    let offset = (value - min) as u32;
    let range = (max - min) as u32;
    Some((offset * (span as u32 - 1) / range) as u16)
}
