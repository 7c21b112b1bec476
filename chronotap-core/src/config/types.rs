//! Configuration type definitions
//!
//! Defaults match the stock deployment: 60 Hz polling, 10 Hz redraw cap,
//! full time format with milliseconds, the two on-screen buttons along the
//! bottom of a 320x240 panel.

use chronotap_display::Rect;

use crate::render::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::state::ButtonId;
use crate::timing::TimeFormat;
use crate::touch::ButtonRegion;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub format: TimeFormat,
    pub show_milliseconds: bool,
    pub show_light_sensor: bool,
    /// Minimum time between redraws
    pub update_interval_ms: u32,
    /// ADC conversions averaged per light reading
    pub light_samples: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: TimeFormat::Full,
            show_milliseconds: true,
            show_light_sensor: true,
            update_interval_ms: 100,
            light_samples: 5,
        }
    }
}

/// `[touch]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// Scheduler iteration rate
    pub poll_hz: u32,
    /// Consecutive stable samples before a press is reported (>= 2)
    pub press_samples: u8,
    /// Consecutive empty polls before a release is reported
    pub release_samples: u8,
    /// Max distance (screen px, per axis) from the first sample of a run
    pub tolerance_px: u16,
    /// Samples below this pressure count as no touch
    pub min_pressure: u16,
    pub raw_x_min: u16,
    pub raw_x_max: u16,
    pub raw_y_min: u16,
    pub raw_y_max: u16,
    /// Controller X axis runs along the screen's Y axis
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            poll_hz: 60,
            press_samples: 3,
            release_samples: 3,
            tolerance_px: 20,
            min_pressure: 100,
            raw_x_min: 200,
            raw_x_max: 3900,
            raw_y_min: 200,
            raw_y_max: 3900,
            swap_xy: false,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl TouchConfig {
    /// Scheduler iteration period in milliseconds
    pub fn period_ms(&self) -> u32 {
        1000 / self.poll_hz.max(1)
    }
}

/// `[led]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    pub enabled: bool,
    /// Common-anode LED: a channel is lit by driving it low
    pub active_low: bool,
    pub red: PinConfig,
    pub green: PinConfig,
    pub blue: PinConfig,
}

impl LedConfig {
    /// Effective polarity, `!gpioN` on any channel also selects active-low
    pub fn is_active_low(&self) -> bool {
        self.active_low || self.red.inverted || self.green.inverted || self.blue.inverted
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            active_low: true,
            red: PinConfig::new(18),
            green: PinConfig::new(19),
            blue: PinConfig::new(20),
        }
    }
}

/// `[pins]` section
///
/// The shared SPI bus pins are fixed by the board; these are the per-device
/// selects and control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinsConfig {
    pub display_cs: PinConfig,
    pub display_dc: PinConfig,
    pub display_rst: PinConfig,
    pub backlight: PinConfig,
    pub touch_cs: PinConfig,
    /// ADC-capable pin (26-29 on RP2040)
    pub light_sensor: PinConfig,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            display_cs: PinConfig::new(9),
            display_dc: PinConfig::new(8),
            display_rst: PinConfig::new(15),
            backlight: PinConfig::new(13),
            touch_cs: PinConfig::new(16),
            light_sensor: PinConfig::new(26),
        }
    }
}

/// `[memory]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryConfig {
    /// Iterations between reclamation passes (300 at 60 Hz is ~5 s)
    pub gc_interval_iterations: u32,
    /// Free heap below this is memory pressure
    pub low_water_bytes: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            gc_interval_iterations: 300,
            low_water_bytes: 4096,
        }
    }
}

/// Default start/stop button, bottom left
pub const DEFAULT_START_STOP: Rect = Rect::new(50, 180, 100, 40);
/// Default reset button, bottom right
pub const DEFAULT_RESET: Rect = Rect::new(170, 180, 100, 40);

/// Complete startup configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StopwatchConfig {
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    /// One region per `ButtonId`, in `ButtonId::ALL` order
    pub buttons: [ButtonRegion; 2],
    pub led: LedConfig,
    pub pins: PinsConfig,
    pub memory: MemoryConfig,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            touch: TouchConfig::default(),
            buttons: [
                ButtonRegion::new(ButtonId::StartStop, DEFAULT_START_STOP),
                ButtonRegion::new(ButtonId::Reset, DEFAULT_RESET),
            ],
            led: LedConfig::default(),
            pins: PinsConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or cannot be parsed
    InvalidValue,
    /// Malformed pin string
    InvalidPin,
    /// Value parsed but is outside its allowed range
    OutOfRange,
}

impl StopwatchConfig {
    /// Region for a button
    pub fn button(&self, id: ButtonId) -> &ButtonRegion {
        match id {
            ButtonId::StartStop => &self.buttons[0],
            ButtonId::Reset => &self.buttons[1],
        }
    }

    pub(crate) fn button_mut(&mut self, id: ButtonId) -> &mut ButtonRegion {
        match id {
            ButtonId::StartStop => &mut self.buttons[0],
            ButtonId::Reset => &mut self.buttons[1],
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.touch;
        if t.poll_hz == 0 || t.poll_hz > 1000 {
            return Err(ConfigError::OutOfRange);
        }
        if t.press_samples < 2 || t.release_samples == 0 {
            return Err(ConfigError::OutOfRange);
        }
        if t.raw_x_min >= t.raw_x_max || t.raw_y_min >= t.raw_y_max {
            return Err(ConfigError::OutOfRange);
        }
        if self.display.update_interval_ms == 0 || self.display.light_samples == 0 {
            return Err(ConfigError::OutOfRange);
        }
        if self.memory.gc_interval_iterations == 0 {
            return Err(ConfigError::OutOfRange);
        }
        for region in &self.buttons {
            if region.rect.is_empty() || !region.rect.fits_within(SCREEN_WIDTH, SCREEN_HEIGHT) {
                return Err(ConfigError::OutOfRange);
            }
        }
        Ok(())
    }
}
