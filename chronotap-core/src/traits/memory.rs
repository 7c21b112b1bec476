//! Heap reclamation trait

/// Heap occupancy after a reclamation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeapStatus {
    /// Bytes currently allocated
    pub used: usize,
    /// Bytes still available
    pub free: usize,
}

impl HeapStatus {
    /// True if free memory is below `low_water` bytes
    pub const fn is_under(&self, low_water: usize) -> bool {
        self.free < low_water
    }
}

/// Trait for the allocator hook run by the periodic reclamation pass
pub trait MemoryReclaimer {
    /// Compact or collect if the allocator supports it, then report occupancy
    fn reclaim(&mut self) -> HeapStatus;
}
