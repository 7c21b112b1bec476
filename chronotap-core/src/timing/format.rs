//! Elapsed-time formatting

use core::fmt::Write;

use heapless::String;

/// Longest formatted time string (13 hour digits for `u64::MAX` ms, plus ":MM:SS.mmm")
pub const TIME_TEXT_LEN: usize = 24;

/// Formatted elapsed time
pub type TimeText = String<TIME_TEXT_LEN>;

/// Display style for elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFormat {
    /// `HH:MM:SS.mmm`
    #[default]
    Full,
    /// `HH:MM:SS` once past an hour, `MM:SS` before
    Short,
    /// `1h 5m`, `5m 3s`, `3.042s`
    Minimal,
}

impl TimeFormat {
    /// Parse a config name (`full`, `short`, `minimal`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(TimeFormat::Full),
            "short" => Some(TimeFormat::Short),
            "minimal" => Some(TimeFormat::Minimal),
            _ => None,
        }
    }
}

/// Elapsed time split into display components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeParts {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl TimeParts {
    /// Split a millisecond count
    pub const fn from_millis(total_ms: u64) -> Self {
        Self {
            hours: total_ms / 3_600_000,
            minutes: ((total_ms % 3_600_000) / 60_000) as u8,
            seconds: ((total_ms % 60_000) / 1000) as u8,
            millis: (total_ms % 1000) as u16,
        }
    }
}

/// Format `total_ms` in the given style
///
/// `show_millis = false` drops the fractional part from the full style.
pub fn format_elapsed(total_ms: u64, style: TimeFormat, show_millis: bool) -> TimeText {
    let t = TimeParts::from_millis(total_ms);
    let mut out = TimeText::new();

    // TIME_TEXT_LEN fits every u64 input, so the write cannot fail
    let _ = match style {
        TimeFormat::Full if show_millis => write!(
            out,
            "{:02}:{:02}:{:02}.{:03}",
            t.hours, t.minutes, t.seconds, t.millis
        ),
        TimeFormat::Full => write!(out, "{:02}:{:02}:{:02}", t.hours, t.minutes, t.seconds),
        TimeFormat::Short if t.hours > 0 => {
            write!(out, "{:02}:{:02}:{:02}", t.hours, t.minutes, t.seconds)
        }
        TimeFormat::Short => write!(out, "{:02}:{:02}", t.minutes, t.seconds),
        TimeFormat::Minimal if t.hours > 0 => write!(out, "{}h {}m", t.hours, t.minutes),
        TimeFormat::Minimal if t.minutes > 0 => write!(out, "{}m {}s", t.minutes, t.seconds),
        TimeFormat::Minimal => write!(out, "{}.{:03}s", t.seconds, t.millis),
    };

    out
}
