//! Board glue between embassy-rp and the core traits

use chronotap_core::time::{Tick, TimeSource};
use chronotap_core::traits::{HeapStatus, MemoryReclaimer};
use chronotap_drivers::sensor::AdcReader;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_time::Instant;
use embedded_alloc::LlffHeap as Heap;

/// Millisecond counter truncated to 32 bits
pub struct BoardClock;

impl TimeSource for BoardClock {
    fn now(&self) -> Tick {
        Tick(Instant::now().as_millis() as u32)
    }
}

/// Heap occupancy reporter for the global allocator
pub struct HeapMonitor {
    heap: &'static Heap,
}

impl HeapMonitor {
    pub fn new(heap: &'static Heap) -> Self {
        Self { heap }
    }
}

impl MemoryReclaimer for HeapMonitor {
    fn reclaim(&mut self) -> HeapStatus {
        // Freed blocks are coalesced on release; there is nothing to compact
        HeapStatus {
            used: self.heap.used(),
            free: self.heap.free(),
        }
    }
}

/// One ADC channel read in blocking mode
pub struct AdcInput {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl AdcInput {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for AdcInput {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}
