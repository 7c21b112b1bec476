//! Monotonic tick counter
//!
//! The hardware counter is a 32-bit millisecond count that wraps roughly
//! every 49.7 days. Ticks are never subtracted directly; every duration is
//! the forward distance between two ticks modulo 2^32.

/// Full counter period in milliseconds
pub const TICK_PERIOD_MS: u64 = 1 << 32;

/// A reading of the 32-bit millisecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Raw counter value
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Forward distance from `earlier` to `self`, modulo the counter period
    ///
    /// Correct across a wrap as long as less than one full period separates
    /// the two readings.
    pub const fn wrapping_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The tick `ms` milliseconds after this one
    pub const fn wrapping_add(self, ms: u32) -> Tick {
        Tick(self.0.wrapping_add(ms))
    }
}

/// Source of monotonic ticks
///
/// Implementations read the hardware counter. Reads must be lock-free and
/// never go backwards (other than by wrapping).
pub trait TimeSource {
    /// Current counter value
    fn now(&self) -> Tick;

    /// Milliseconds elapsed from `mark` to now
    fn elapsed_since(&self, mark: Tick) -> u32 {
        self.now().wrapping_since(mark)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}
