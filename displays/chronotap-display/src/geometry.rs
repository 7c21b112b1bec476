//! Screen geometry

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Left edge
    pub x: u16,
    /// Top edge
    pub y: u16,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (inclusive)
    pub const fn right(&self) -> u16 {
        self.x + self.width.saturating_sub(1)
    }

    /// Bottom edge (inclusive)
    pub const fn bottom(&self) -> u16 {
        self.y + self.height.saturating_sub(1)
    }

    /// Check whether a point lies inside the rectangle (edges inclusive)
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        !self.is_empty() && x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// True if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check the rectangle lies entirely on a panel of the given size
    pub const fn fits_within(&self, width: u16, height: u16) -> bool {
        (self.x as u32 + self.width as u32) <= width as u32
            && (self.y as u32 + self.height as u32) <= height as u32
    }

    /// Shrink the rectangle by `margin` pixels on every side
    pub const fn inset(&self, margin: u16) -> Self {
        let w = self.width.saturating_sub(margin * 2);
        let h = self.height.saturating_sub(margin * 2);
        Self::new(self.x + margin, self.y + margin, w, h)
    }
}
