//! Display backend trait
//!
//! Defines the interface a panel driver offers to the renderer.

use embedded_graphics::pixelcolor::Rgb565;

use crate::geometry::Rect;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Region lies outside the panel
    InvalidCoordinates,
    /// Pixel block does not match the region size
    SizeMismatch,
    /// Display not initialized
    NotInitialized,
    /// Scratch buffer could not be allocated
    BufferOverflow,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to displays.
/// Implementations own the bus and complete each call's transfer before
/// returning, so a call never interleaves with traffic to another device on
/// the same bus.
pub trait DisplayBackend {
    /// Bring the panel out of reset and configure it
    ///
    /// Must be called once before any `draw_region`.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Write a block of pixels to a rectangular region
    ///
    /// `pixels` is row-major and must contain exactly
    /// `area.width * area.height` entries.
    fn draw_region(&mut self, area: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Panel size in pixels as (width, height)
    fn dimensions(&self) -> (u16, u16);

    /// Check the region fits the panel and the pixel block matches it
    fn check_region(&self, area: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        let (width, height) = self.dimensions();
        if area.is_empty() || !area.fits_within(width, height) {
            return Err(DisplayError::InvalidCoordinates);
        }
        if pixels.len() != area.pixel_count() {
            return Err(DisplayError::SizeMismatch);
        }
        Ok(())
    }
}
