//! Display frame content

use core::fmt::Write;

use heapless::String;

use crate::state::StopwatchState;
use crate::timing::{format_elapsed, TimeFormat, TimeText};

use super::layout::Field;

/// Longest non-time field text
pub const LABEL_LEN: usize = 24;

/// Short text for labels and the status bar
pub type Label = String<LABEL_LEN>;

/// Half-period of the running indicator blink (1 Hz)
pub const DOT_HALF_PERIOD_MS: u64 = 500;

/// How the elapsed time is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStyle {
    pub format: TimeFormat,
    pub show_milliseconds: bool,
    pub show_light: bool,
}

/// Everything the screen shows, as values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub time: TimeText,
    pub state: StopwatchState,
    /// Raw light level, `None` when the read failed
    pub light: Option<u16>,
    pub show_light: bool,
    pub dot: bool,
}

impl DisplayFrame {
    /// Build the candidate frame for the current iteration
    pub fn build(
        elapsed_ms: u64,
        state: StopwatchState,
        light: Option<u16>,
        style: &FrameStyle,
    ) -> Self {
        let dot = state.is_running() && (elapsed_ms / DOT_HALF_PERIOD_MS) % 2 == 1;
        Self {
            time: format_elapsed(elapsed_ms, style.format, style.show_milliseconds),
            state,
            light: if style.show_light { light } else { None },
            show_light: style.show_light,
            dot,
        }
    }

    /// Check if a field's on-screen content differs between two frames
    pub fn differs(&self, other: &DisplayFrame, field: Field) -> bool {
        match field {
            // Time color follows the running state
            Field::Time => {
                self.time != other.time || self.state.is_running() != other.state.is_running()
            }
            Field::Dot => self.dot != other.dot,
            Field::StartLabel => self.start_label() != other.start_label(),
            Field::Status => self.state != other.state,
            Field::Light => {
                self.show_light != other.show_light || self.light_text() != other.light_text()
            }
        }
    }

    /// `Start` or `Stop`
    pub fn start_label(&self) -> &'static str {
        if self.state.is_running() {
            "Stop"
        } else {
            "Start"
        }
    }

    /// `Status: Ready|Running|Stopped`
    pub fn status_text(&self) -> Label {
        let mut out = Label::new();
        let _ = write!(out, "Status: {}", self.state.label());
        out
    }

    /// `Light: Nk`, or `Light: --` without a reading
    pub fn light_text(&self) -> Label {
        let mut out = Label::new();
        if !self.show_light {
            return out;
        }
        let _ = match self.light {
            Some(level) => write!(out, "Light: {}k", level / 1000),
            None => write!(out, "Light: --"),
        };
        out
    }
}
