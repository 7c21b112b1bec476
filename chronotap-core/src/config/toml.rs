//! Simple TOML parser for stopwatch configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `stopwatch.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - [button.name] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers
//!
//! Nothing is allocated; values are parsed straight out of the input.

use crate::state::ButtonId;
use crate::timing::TimeFormat;

use super::types::{ConfigError, PinConfig, StopwatchConfig};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Touch,
    Button(ButtonId),
    Led,
    Pins,
    Memory,
}

/// Parse TOML configuration into `StopwatchConfig`
///
/// Keys that are absent keep their default. Unknown keys are ignored so
/// older firmware tolerates newer files; unknown sections are rejected.
pub fn parse_config(input: &str) -> Result<StopwatchConfig, ConfigError> {
    let mut config = StopwatchConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ConfigError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse a section header like "display" or "button.start_stop"
fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    let header = header.trim();

    if let Some((kind, name)) = header.split_once('.') {
        return match kind.trim() {
            "button" => ButtonId::from_name(name.trim())
                .map(Section::Button)
                .ok_or(ConfigError::InvalidSection),
            _ => Err(ConfigError::InvalidSection),
        };
    }

    match header {
        "display" => Ok(Section::Display),
        "touch" => Ok(Section::Touch),
        "led" => Ok(Section::Led),
        "pins" => Ok(Section::Pins),
        "memory" => Ok(Section::Memory),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => {
            text[..hash_pos].trim()
        }
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
pub fn parse_pin(value: &str) -> Result<PinConfig, ConfigError> {
    let mut s = parse_string(value);
    let mut pin = PinConfig::default();

    // Modifiers in any order
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            pin.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pin.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let num = s.strip_prefix("gpio").ok_or(ConfigError::InvalidPin)?;
    pin.pin = num.parse().map_err(|_| ConfigError::InvalidPin)?;
    Ok(pin)
}

fn parse_format(value: &str) -> Result<TimeFormat, ConfigError> {
    TimeFormat::from_name(parse_string(value)).ok_or(ConfigError::InvalidValue)
}

/// Apply a key/value pair to the current section
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut StopwatchConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Display => {
            let d = &mut config.display;
            match key {
                "format" => d.format = parse_format(value)?,
                "show_milliseconds" => d.show_milliseconds = parse_bool(value)?,
                "show_light_sensor" => d.show_light_sensor = parse_bool(value)?,
                "update_interval_ms" => d.update_interval_ms = parse_int(value)?,
                "light_samples" => d.light_samples = parse_int(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Touch => {
            let t = &mut config.touch;
            match key {
                "poll_hz" => t.poll_hz = parse_int(value)?,
                "press_samples" => t.press_samples = parse_int(value)?,
                "release_samples" => t.release_samples = parse_int(value)?,
                "tolerance_px" => t.tolerance_px = parse_int(value)?,
                "min_pressure" => t.min_pressure = parse_int(value)?,
                "raw_x_min" => t.raw_x_min = parse_int(value)?,
                "raw_x_max" => t.raw_x_max = parse_int(value)?,
                "raw_y_min" => t.raw_y_min = parse_int(value)?,
                "raw_y_max" => t.raw_y_max = parse_int(value)?,
                "swap_xy" => t.swap_xy = parse_bool(value)?,
                "invert_x" => t.invert_x = parse_bool(value)?,
                "invert_y" => t.invert_y = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Button(id) => {
            let rect = &mut config.button_mut(id).rect;
            match key {
                "x" => rect.x = parse_int(value)?,
                "y" => rect.y = parse_int(value)?,
                "width" => rect.width = parse_int(value)?,
                "height" => rect.height = parse_int(value)?,
                _ => {}
            }
        }
        Section::Led => {
            let l = &mut config.led;
            match key {
                "enabled" => l.enabled = parse_bool(value)?,
                "active_low" => l.active_low = parse_bool(value)?,
                "red" | "red_pin" => l.red = parse_pin(value)?,
                "green" | "green_pin" => l.green = parse_pin(value)?,
                "blue" | "blue_pin" => l.blue = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Pins => {
            let p = &mut config.pins;
            match key {
                "display_cs" => p.display_cs = parse_pin(value)?,
                "display_dc" => p.display_dc = parse_pin(value)?,
                "display_rst" => p.display_rst = parse_pin(value)?,
                "backlight" => p.backlight = parse_pin(value)?,
                "touch_cs" => p.touch_cs = parse_pin(value)?,
                "light_sensor" => p.light_sensor = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Memory => {
            let m = &mut config.memory;
            match key {
                "gc_interval_iterations" => m.gc_interval_iterations = parse_int(value)?,
                "low_water_bytes" => m.low_water_bytes = parse_int(value)?,
                _ => {}
            }
        }
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronotap_display::Rect;

    #[test]
    fn test_firmware_config_matches_defaults() {
        let shipped = include_str!("../../../chronotap-firmware/stopwatch.toml");
        assert_eq!(parse_config(shipped), Ok(StopwatchConfig::default()));
    }

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio11").unwrap();
        assert_eq!(pin.pin, 11);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let pin = parse_pin("\"!gpio18\"").unwrap();
        assert_eq!(pin.pin, 18);
        assert!(pin.inverted);

        let pin = parse_pin("^!gpio5").unwrap();
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("pin5"), Err(ConfigError::InvalidPin));
        assert_eq!(parse_pin("gpio"), Err(ConfigError::InvalidPin));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("display"), Ok(Section::Display));
        assert_eq!(
            parse_section_header("button.reset"),
            Ok(Section::Button(ButtonId::Reset))
        );
        assert_eq!(
            parse_section_header("button.lap"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(parse_section_header("wifi"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(StopwatchConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Stopwatch configuration
[display]
format = "short"
show_milliseconds = false
show_light_sensor = false   # no LDR fitted
update_interval_ms = 200
light_samples = 8

[touch]
poll_hz = 50
press_samples = 4
tolerance_px = 15
swap_xy = true

[button.start_stop]
x = 20
y = 170
width = 120
height = 50

[led]
enabled = false
red = "!gpio6"

[pins]
touch_cs = "gpio17"

[memory]
gc_interval_iterations = 250
low_water_bytes = 2048
"#;
        let config = parse_config(config_str).unwrap();
        assert_eq!(config.display.format, TimeFormat::Short);
        assert!(!config.display.show_milliseconds);
        assert!(!config.display.show_light_sensor);
        assert_eq!(config.display.update_interval_ms, 200);
        assert_eq!(config.display.light_samples, 8);
        assert_eq!(config.touch.poll_hz, 50);
        assert_eq!(config.touch.press_samples, 4);
        assert_eq!(config.touch.release_samples, 3);
        assert!(config.touch.swap_xy);
        assert_eq!(
            config.button(ButtonId::StartStop).rect,
            Rect::new(20, 170, 120, 50)
        );
        assert!(!config.led.enabled);
        assert_eq!(config.led.red, PinConfig::inverted(6));
        assert_eq!(config.pins.touch_cs.pin, 17);
        assert_eq!(config.memory.gc_interval_iterations, 250);
        assert_eq!(config.memory.low_water_bytes, 2048);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[display]\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config, StopwatchConfig::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            parse_config("[display]\nformat = \"fancy\""),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[touch]\npoll_hz = fast"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[led]\nenabled = yes"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(parse_config("[display"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_range_checked_after_parse() {
        assert_eq!(
            parse_config("[touch]\npress_samples = 1"),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            parse_config("[touch]\nraw_x_min = 4000"),
            Err(ConfigError::OutOfRange)
        );
    }
}
