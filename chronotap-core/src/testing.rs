//! Mock collaborators for host tests

use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;

use crate::time::{Tick, TimeSource};
use crate::traits::{
    DisplayBackend, DisplayError, HeapStatus, LedColor, LightSensor, MemoryReclaimer, RawTouch,
    SensorError, StatusLed, TouchDriver, TouchError,
};
use chronotap_display::Rect;

/// Manually advanced millisecond counter
pub struct MockClock {
    now: Cell<u32>,
    /// Added after every read, to simulate work between reads
    auto_step: u32,
}

impl MockClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
            auto_step: 0,
        }
    }

    pub fn with_auto_step(start: u32, step: u32) -> Self {
        Self {
            now: Cell::new(start),
            auto_step: step,
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, value: u32) {
        self.now.set(value);
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> Tick {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.auto_step));
        Tick(now)
    }
}

/// Touch driver replaying a fixed script, then reporting no touch
#[derive(Default)]
pub struct ScriptedTouch {
    script: VecDeque<Result<Option<RawTouch>, TouchError>>,
    pub fail_init: bool,
    pub reads: usize,
}

impl ScriptedTouch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a touch at raw coordinates with firm pressure
    pub fn touch(&mut self, x: u16, y: u16) -> &mut Self {
        self.script.push_back(Ok(Some(RawTouch {
            x,
            y,
            pressure: 1000,
        })));
        self
    }

    /// Queue the same touch `n` times
    pub fn hold(&mut self, x: u16, y: u16, n: usize) -> &mut Self {
        for _ in 0..n {
            self.touch(x, y);
        }
        self
    }

    pub fn raw(&mut self, sample: RawTouch) -> &mut Self {
        self.script.push_back(Ok(Some(sample)));
        self
    }

    pub fn empty(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.script.push_back(Ok(None));
        }
        self
    }

    pub fn error(&mut self, err: TouchError) -> &mut Self {
        self.script.push_back(Err(err));
        self
    }
}

impl TouchDriver for ScriptedTouch {
    fn init(&mut self) -> Result<(), TouchError> {
        if self.fail_init {
            Err(TouchError::Communication)
        } else {
            Ok(())
        }
    }

    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

/// 320x240 panel that records every region push
pub struct RecordingDisplay {
    pub regions: Vec<Rect>,
    /// Row-major copy of what the panel currently shows
    pub frame: Vec<Rgb565>,
    pub initialized: bool,
    pub fail_init: bool,
    /// Fail this many upcoming draws
    pub fail_draws: usize,
}

impl RecordingDisplay {
    pub const WIDTH: u16 = 320;
    pub const HEIGHT: u16 = 240;

    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            frame: vec![Rgb565::new(0, 0, 0); Self::WIDTH as usize * Self::HEIGHT as usize],
            initialized: false,
            fail_init: false,
            fail_draws: 0,
        }
    }

    pub fn pixel(&self, x: u16, y: u16) -> Rgb565 {
        self.frame[y as usize * Self::WIDTH as usize + x as usize]
    }

    pub fn clear_log(&mut self) {
        self.regions.clear();
    }
}

impl DisplayBackend for RecordingDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.fail_init {
            return Err(DisplayError::Communication);
        }
        self.initialized = true;
        Ok(())
    }

    fn draw_region(&mut self, area: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.check_region(area, pixels)?;
        if self.fail_draws > 0 {
            self.fail_draws -= 1;
            return Err(DisplayError::Communication);
        }
        for row in 0..area.height as usize {
            let src = &pixels[row * area.width as usize..(row + 1) * area.width as usize];
            let start = (area.y as usize + row) * Self::WIDTH as usize + area.x as usize;
            self.frame[start..start + area.width as usize].copy_from_slice(src);
        }
        self.regions.push(area);
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (Self::WIDTH, Self::HEIGHT)
    }
}

/// LED that remembers every color it was asked to show
#[derive(Default)]
pub struct RecordingLed {
    pub history: Vec<LedColor>,
}

impl RecordingLed {
    pub fn current(&self) -> LedColor {
        self.history.last().copied().unwrap_or_default()
    }
}

impl StatusLed for RecordingLed {
    fn show(&mut self, color: LedColor) {
        self.history.push(color);
    }
}

/// Light sensor returning a settable level
pub struct FixedLight {
    pub level: Result<u16, SensorError>,
}

impl FixedLight {
    pub fn new(level: u16) -> Self {
        Self { level: Ok(level) }
    }
}

impl LightSensor for FixedLight {
    fn read_level(&mut self) -> Result<u16, SensorError> {
        self.level
    }
}

/// Reclaimer reporting a settable free-heap figure
pub struct FakeMemory {
    pub free: usize,
    pub passes: usize,
}

impl FakeMemory {
    pub fn new(free: usize) -> Self {
        Self { free, passes: 0 }
    }
}

impl MemoryReclaimer for FakeMemory {
    fn reclaim(&mut self) -> HeapStatus {
        self.passes += 1;
        HeapStatus {
            used: 16 * 1024 - self.free.min(16 * 1024),
            free: self.free,
        }
    }
}
