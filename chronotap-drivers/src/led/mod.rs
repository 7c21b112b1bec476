//! Status LED drivers

pub mod rgb;

pub use rgb::RgbLed;
