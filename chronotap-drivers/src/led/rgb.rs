//! RGB status LED on three GPIOs

use chronotap_core::traits::{LedColor, StatusLed};
use embedded_hal::digital::OutputPin;

/// Tri-color LED, one pin per channel
///
/// Common-anode parts light a channel by pulling it low; pass
/// `active_low = true` for those.
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    active_low: bool,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbLed<R, G, B> {
    /// Create the LED and turn it off
    pub fn new(red: R, green: G, blue: B, active_low: bool) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            active_low,
        };
        led.show(LedColor::Off);
        led
    }

    fn drive<P: OutputPin>(pin: &mut P, lit: bool, active_low: bool) {
        // GPIO writes on the supported targets cannot fail
        let _ = if lit != active_low {
            pin.set_high()
        } else {
            pin.set_low()
        };
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> StatusLed for RgbLed<R, G, B> {
    fn show(&mut self, color: LedColor) {
        let (r, g, b) = color.channels();
        Self::drive(&mut self.red, r, self.active_low);
        Self::drive(&mut self.green, g, self.active_low);
        Self::drive(&mut self.blue, b, self.active_low);
    }
}
