//! Build script for chronotap-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates stopwatch.toml at compile time

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const SCREEN_WIDTH: u32 = 320;
const SCREEN_HEIGHT: u32 = 240;
const GPIO_COUNT: u8 = 30;
/// SCK, MOSI, MISO of the board's SPI bus
const SPI_BUS_PINS: [u8; 3] = [10, 11, 12];

/// Mirror of the firmware's config layout; every field is optional because
/// the firmware falls back to defaults for missing keys
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    display: Option<DisplaySection>,
    touch: Option<TouchSection>,
    button: BTreeMap<String, ButtonSection>,
    led: Option<LedSection>,
    pins: BTreeMap<String, String>,
    memory: Option<MemorySection>,
}

#[derive(Debug, Deserialize)]
struct DisplaySection {
    format: Option<String>,
    update_interval_ms: Option<i64>,
    light_samples: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TouchSection {
    poll_hz: Option<i64>,
    press_samples: Option<i64>,
    release_samples: Option<i64>,
    raw_x_min: Option<i64>,
    raw_x_max: Option<i64>,
    raw_y_min: Option<i64>,
    raw_y_max: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ButtonSection {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

#[derive(Debug, Deserialize)]
struct LedSection {
    red: Option<String>,
    green: Option<String>,
    blue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemorySection {
    gc_interval_iterations: Option<i64>,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate stopwatch.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=stopwatch.toml");

    let config_path = Path::new("stopwatch.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: stopwatch.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds stopwatch.toml at build time.               ║\n\
            ║  Please create one in the chronotap-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read stopwatch.toml", &[e.to_string()]),
    };

    let config: ConfigFile = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid stopwatch.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_touch(&config, &mut errors);
    validate_buttons(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if let Some(memory) = &config.memory {
        if matches!(memory.gc_interval_iterations, Some(n) if n <= 0) {
            errors.push("[memory] gc_interval_iterations must be positive".into());
        }
    }

    if !errors.is_empty() {
        fail("Invalid stopwatch configuration", &errors);
    }

    println!("cargo:warning=stopwatch.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.clone()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_display(config: &ConfigFile, errors: &mut Vec<String>) {
    let Some(display) = &config.display else {
        return;
    };
    if let Some(format) = &display.format {
        if !["full", "short", "minimal"].contains(&format.as_str()) {
            errors.push("[display] format must be 'full', 'short', or 'minimal'".into());
        }
    }
    if matches!(display.update_interval_ms, Some(n) if n <= 0) {
        errors.push("[display] update_interval_ms must be positive".into());
    }
    if matches!(display.light_samples, Some(n) if !(1..=255).contains(&n)) {
        errors.push("[display] light_samples must be between 1 and 255".into());
    }
}

fn validate_touch(config: &ConfigFile, errors: &mut Vec<String>) {
    let Some(touch) = &config.touch else {
        return;
    };
    if matches!(touch.poll_hz, Some(n) if !(1..=1000).contains(&n)) {
        errors.push("[touch] poll_hz must be 1-1000".into());
    }
    if matches!(touch.press_samples, Some(n) if n < 2) {
        errors.push("[touch] press_samples must be at least 2".into());
    }
    if matches!(touch.release_samples, Some(n) if n < 1) {
        errors.push("[touch] release_samples must be at least 1".into());
    }

    let x_min = touch.raw_x_min.unwrap_or(200);
    let x_max = touch.raw_x_max.unwrap_or(3900);
    let y_min = touch.raw_y_min.unwrap_or(200);
    let y_max = touch.raw_y_max.unwrap_or(3900);
    if x_min >= x_max || y_min >= y_max {
        errors.push("[touch] raw_*_min must be below raw_*_max".into());
    }
}

fn validate_buttons(config: &ConfigFile, errors: &mut Vec<String>) {
    for (name, button) in &config.button {
        if name != "start_stop" && name != "reset" {
            errors.push(format!(
                "[button.{}] unknown button (start_stop, reset)",
                name
            ));
            continue;
        }
        if button.width <= 0 || button.height <= 0 {
            errors.push(format!("[button.{}] width and height must be positive", name));
        }
        if button.x < 0
            || button.y < 0
            || button.x + button.width > SCREEN_WIDTH as i64
            || button.y + button.height > SCREEN_HEIGHT as i64
        {
            errors.push(format!(
                "[button.{}] must fit on the {}x{} screen",
                name, SCREEN_WIDTH, SCREEN_HEIGHT
            ));
        }
    }
}

/// Pin strings: "gpioN" with optional "!" (inverted) and "^" (pull-up)
fn parse_pin(s: &str) -> Option<u8> {
    let s = s.trim().trim_start_matches(['!', '^']);
    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    (pin < GPIO_COUNT).then_some(pin)
}

fn validate_pins(config: &ConfigFile, errors: &mut Vec<String>) {
    let mut assigned: Vec<(String, String)> = config
        .pins
        .iter()
        .map(|(k, v)| (format!("pins.{}", k), v.clone()))
        .collect();

    // Claimed even when disabled; the init-failure blink drives them
    if let Some(led) = &config.led {
        for (name, pin) in [("red", &led.red), ("green", &led.green), ("blue", &led.blue)] {
            if let Some(pin) = pin {
                assigned.push((format!("led.{}", name), pin.clone()));
            }
        }
    }

    let mut used: BTreeMap<u8, String> = BTreeMap::new();
    for (name, value) in &assigned {
        let Some(pin) = parse_pin(value) else {
            errors.push(format!("[{}] invalid pin '{}'", name, value));
            continue;
        };
        if SPI_BUS_PINS.contains(&pin) {
            errors.push(format!("[{}] gpio{} is reserved for the SPI bus", name, pin));
        } else if let Some(other) = used.insert(pin, name.clone()) {
            errors.push(format!("[{}] gpio{} already used by {}", name, pin, other));
        }
        if name == "pins.light_sensor" && !(26..=29).contains(&pin) {
            errors.push(format!("[{}] gpio{} has no ADC input", name, pin));
        }
    }
}
