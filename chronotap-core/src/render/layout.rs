//! Screen layout
//!
//! Every dynamic field owns a fixed rectangle so it can be redrawn without
//! touching its neighbours.

use chronotap_display::Rect;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::state::ButtonId;
use crate::touch::ButtonRegion;

pub const SCREEN_WIDTH: u16 = 320;
pub const SCREEN_HEIGHT: u16 = 240;

pub const TITLE: &str = "CYD STOPWATCH";
pub const RESET_LABEL: &str = "Reset";

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const TITLE_COLOR: Rgb565 = Rgb565::YELLOW;
pub const TIME_IDLE_COLOR: Rgb565 = Rgb565::WHITE;
pub const TIME_RUNNING_COLOR: Rgb565 = Rgb565::GREEN;
pub const STATUS_COLOR: Rgb565 = Rgb565::CYAN;
pub const DOT_COLOR: Rgb565 = Rgb565::RED;
pub const BUTTON_FILL: Rgb565 = Rgb565::new(8, 16, 8);
pub const BUTTON_BORDER: Rgb565 = Rgb565::WHITE;
pub const BUTTON_TEXT: Rgb565 = Rgb565::WHITE;

/// Rows cleared per strip when painting the background
pub const CLEAR_STRIP_ROWS: u16 = 16;

/// Dynamic frame fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Time,
    Dot,
    StartLabel,
    Status,
    Light,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Time,
        Field::Dot,
        Field::StartLabel,
        Field::Status,
        Field::Light,
    ];

    /// Bit in a dirty mask
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Rectangles for the static decoration and each field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub title: Rect,
    pub time: Rect,
    pub dot: Rect,
    pub status: Rect,
    pub light: Rect,
    pub start_stop: Rect,
    pub reset: Rect,
}

impl Layout {
    /// Stock layout around the configured button rectangles
    pub fn new(buttons: &[ButtonRegion; 2]) -> Self {
        let find = |id| {
            buttons
                .iter()
                .find(|b| b.id == id)
                .map(|b| b.rect)
                .unwrap_or_default()
        };
        Self {
            title: Rect::new(0, 8, SCREEN_WIDTH, 24),
            time: Rect::new(40, 70, 240, 20),
            dot: Rect::new(294, 84, 12, 12),
            status: Rect::new(0, 230, 200, 10),
            light: Rect::new(200, 230, 120, 10),
            start_stop: find(ButtonId::StartStop),
            reset: find(ButtonId::Reset),
        }
    }

    /// Rectangle owned by a field
    pub fn field_rect(&self, field: Field) -> Rect {
        match field {
            Field::Time => self.time,
            Field::Dot => self.dot,
            // Inside the button border
            Field::StartLabel => self.start_stop.inset(1),
            Field::Status => self.status,
            Field::Light => self.light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StopwatchConfig;

    #[test]
    fn test_stock_layout_fits_screen() {
        let layout = Layout::new(&StopwatchConfig::default().buttons);
        for field in Field::ALL {
            let rect = layout.field_rect(field);
            assert!(!rect.is_empty(), "{:?}", field);
            assert!(rect.fits_within(SCREEN_WIDTH, SCREEN_HEIGHT), "{:?}", field);
        }
        assert!(layout.title.fits_within(SCREEN_WIDTH, SCREEN_HEIGHT));
    }

    #[test]
    fn test_field_bits_are_distinct() {
        let mask = Field::ALL.iter().fold(0u8, |acc, f| {
            assert_eq!(acc & f.bit(), 0);
            acc | f.bit()
        });
        assert_eq!(mask, 0b1_1111);
    }
}
