//! Scratch raster for region redraws
//!
//! A `Canvas` is sized to one screen region at a time. Text and shapes are
//! drawn into it with `embedded-graphics`, then the whole block is pushed to
//! the panel with `DisplayBackend::draw_region`.
//!
//! The pixel storage lives on the heap and is kept between redraws so the
//! steady state does no allocation. `release` hands it back to the allocator.

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::backend::DisplayError;

/// Region-sized pixel buffer implementing `DrawTarget`
#[derive(Debug, Default)]
pub struct Canvas {
    width: u16,
    height: u16,
    pixels: Vec<Rgb565>,
}

impl Canvas {
    /// Create an empty canvas (no allocation until first `prepare`)
    pub const fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Resize to `width` x `height` and fill with `background`
    ///
    /// Reuses the existing allocation when it is large enough. Fails with
    /// `BufferOverflow` instead of aborting when the heap cannot satisfy the
    /// request.
    pub fn prepare(
        &mut self,
        width: u16,
        height: u16,
        background: Rgb565,
    ) -> Result<(), DisplayError> {
        let count = width as usize * height as usize;
        self.pixels.clear();
        self.pixels
            .try_reserve_exact(count)
            .map_err(|_| DisplayError::BufferOverflow)?;
        self.pixels.resize(count, background);
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Row-major pixel block for the prepared region
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Heap bytes currently held by the canvas
    pub fn capacity_bytes(&self) -> usize {
        self.pixels.capacity() * core::mem::size_of::<Rgb565>()
    }

    /// Free the pixel storage
    pub fn release(&mut self) {
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.width as i32, self.height as i32);
        for Pixel(point, color) in pixels {
            // Glyphs clipped at the region edge are dropped
            if point.x >= 0 && point.x < w && point.y >= 0 && point.y < h {
                let idx = point.y as usize * self.width as usize + point.x as usize;
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }
}
