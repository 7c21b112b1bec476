//! Display panel drivers

pub mod ili9341;

pub use ili9341::Ili9341;
