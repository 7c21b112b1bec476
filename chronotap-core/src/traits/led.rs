//! Status LED trait

/// Colors the status LED can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Blue,
    Green,
    Red,
}

impl LedColor {
    /// Channel levels as (red, green, blue), true = lit
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            LedColor::Off => (false, false, false),
            LedColor::Red => (true, false, false),
            LedColor::Green => (false, true, false),
            LedColor::Blue => (false, false, true),
        }
    }
}

/// Trait for a tri-color status output
///
/// Polarity (common anode vs cathode) is the implementation's concern.
pub trait StatusLed {
    /// Drive the LED to the given color
    fn show(&mut self, color: LedColor);
}
