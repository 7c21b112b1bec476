//! Button hit-testing

use chronotap_display::Rect;

use crate::state::ButtonId;

/// Static screen rectangle owned by a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonRegion {
    pub id: ButtonId,
    pub rect: Rect,
}

impl ButtonRegion {
    pub const fn new(id: ButtonId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// First button whose region contains the point
pub fn hit_test(regions: &[ButtonRegion], x: u16, y: u16) -> Option<ButtonId> {
    regions
        .iter()
        .find(|region| region.rect.contains(x, y))
        .map(|region| region.id)
}
