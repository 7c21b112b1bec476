//! Status LED mapping
//!
//! The LED color is a pure function of the stopwatch state, with one
//! diagnostic pattern reserved for hardware init failure.

use crate::state::StopwatchState;
use crate::time::Tick;
use crate::traits::LedColor;

/// Half-period of the diagnostic blink (2 Hz)
pub const DIAGNOSTIC_HALF_PERIOD_MS: u32 = 250;

/// Color for a stopwatch state
pub const fn color_for(state: StopwatchState) -> LedColor {
    match state {
        StopwatchState::Idle => LedColor::Blue,
        StopwatchState::Running => LedColor::Green,
        StopwatchState::Stopped => LedColor::Red,
    }
}

/// Diagnostic pattern: red for 250 ms, off for 250 ms
pub const fn diagnostic_color(now: Tick) -> LedColor {
    if (now.as_millis() / DIAGNOSTIC_HALF_PERIOD_MS) % 2 == 0 {
        LedColor::Red
    } else {
        LedColor::Off
    }
}

/// State-to-color mapper honoring the `led_enabled` switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedIndicator {
    enabled: bool,
    last: Option<LedColor>,
}

impl LedIndicator {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: None,
        }
    }

    /// Color to show for `state`
    pub const fn color(&self, state: StopwatchState) -> LedColor {
        if self.enabled {
            color_for(state)
        } else {
            LedColor::Off
        }
    }

    /// Record the color about to be shown
    ///
    /// Returns true if it differs from the previous one.
    pub fn update(&mut self, color: LedColor) -> bool {
        let changed = self.last != Some(color);
        self.last = Some(color);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_colors() {
        assert_eq!(color_for(StopwatchState::Idle), LedColor::Blue);
        assert_eq!(color_for(StopwatchState::Running), LedColor::Green);
        assert_eq!(color_for(StopwatchState::Stopped), LedColor::Red);
    }

    #[test]
    fn test_disabled_forces_off() {
        let led = LedIndicator::new(false);
        assert_eq!(led.color(StopwatchState::Running), LedColor::Off);
        assert_eq!(led.color(StopwatchState::Idle), LedColor::Off);
    }

    #[test]
    fn test_diagnostic_blinks_at_two_hz() {
        assert_eq!(diagnostic_color(Tick(0)), LedColor::Red);
        assert_eq!(diagnostic_color(Tick(249)), LedColor::Red);
        assert_eq!(diagnostic_color(Tick(250)), LedColor::Off);
        assert_eq!(diagnostic_color(Tick(499)), LedColor::Off);
        assert_eq!(diagnostic_color(Tick(500)), LedColor::Red);
    }

    #[test]
    fn test_update_reports_changes() {
        let mut led = LedIndicator::new(true);
        assert!(led.update(LedColor::Blue));
        assert!(!led.update(LedColor::Blue));
        assert!(led.update(LedColor::Green));
    }
}
