//! Startup configuration
//!
//! `StopwatchConfig` is read once at boot from the embedded TOML file and is
//! immutable afterwards.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, parse_pin};
pub use types::{
    ConfigError, DisplayConfig, LedConfig, MemoryConfig, PinConfig, PinsConfig, StopwatchConfig,
    TouchConfig,
};
