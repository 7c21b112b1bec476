//! Cooperative loop body
//!
//! One call to `run_iteration` is one pass of the firmware loop. The caller
//! sleeps for the returned budget and calls it again; there is no other
//! suspension point.

use crate::config::StopwatchConfig;
use crate::led::LedIndicator;
use crate::render::{DisplayFrame, FrameStyle, Layout, RenderReport, Renderer};
use crate::render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::state::{ButtonEvent, Stopwatch, StopwatchState};
use crate::time::TimeSource;
use crate::touch::{SampleFault, TouchSample, TouchSampler};
use crate::traits::{
    DisplayBackend, DisplayError, HeapStatus, LedColor, LightSensor, MemoryReclaimer, SensorError,
    StatusLed, TouchDriver, TouchError,
};

/// Hardware init failures; the firmware shows the diagnostic pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalError {
    DisplayInit(DisplayError),
    TouchInit(TouchError),
}

/// Everything the loop talks to, built once at startup
pub struct Peripherals<C, D, T, L, S, M> {
    pub clock: C,
    pub display: D,
    pub touch: T,
    pub led: L,
    pub light: S,
    pub memory: M,
}

/// Times reported when the stopwatch stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionSummary {
    /// Run segment that just closed
    pub segment_ms: u64,
    /// Accumulated total including that segment
    pub total_ms: u64,
}

/// What happened during one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IterationReport {
    /// Debounced button event, if any
    pub event: Option<ButtonEvent>,
    /// Last accepted raw sample when an event fired
    pub touch: Option<TouchSample>,
    /// New state when the event caused a transition
    pub transition: Option<StopwatchState>,
    /// Set on the iteration that stopped the stopwatch
    pub session: Option<SessionSummary>,
    pub touch_fault: Option<SampleFault>,
    pub led: LedColor,
    pub led_changed: bool,
    pub render: Option<RenderReport>,
    pub light_fault: Option<SensorError>,
    /// Heap status when a reclamation pass ran
    pub heap: Option<HeapStatus>,
    /// Free heap was below the low-water mark
    pub memory_pressure: bool,
    /// Time spent in this iteration
    pub busy_ms: u32,
    /// Remaining time to sleep before the next iteration
    pub sleep_ms: u32,
}

/// Loop state: stopwatch, touch pipeline, LED mapping and renderer
pub struct Scheduler {
    stopwatch: Stopwatch,
    sampler: TouchSampler,
    led: LedIndicator,
    renderer: Renderer,
    style: FrameStyle,
    period_ms: u32,
    gc_interval: u32,
    low_water: usize,
    iteration: u32,
}

impl Scheduler {
    /// Build the loop from a validated configuration
    pub fn new(config: &StopwatchConfig) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            sampler: TouchSampler::new(
                &config.touch,
                config.buttons,
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
            ),
            led: LedIndicator::new(config.led.enabled),
            renderer: Renderer::new(
                Layout::new(&config.buttons),
                config.display.update_interval_ms,
            ),
            style: FrameStyle {
                format: config.display.format,
                show_milliseconds: config.display.show_milliseconds,
                show_light: config.display.show_light_sensor,
            },
            period_ms: config.touch.period_ms(),
            gc_interval: config.memory.gc_interval_iterations.max(1),
            low_water: config.memory.low_water_bytes as usize,
            iteration: 0,
        }
    }

    /// Bring up the display and touch controller
    pub fn init<C, D, T, L, S, M>(
        &mut self,
        p: &mut Peripherals<C, D, T, L, S, M>,
    ) -> Result<(), FatalError>
    where
        D: DisplayBackend,
        T: TouchDriver,
        L: StatusLed,
    {
        p.display.init().map_err(FatalError::DisplayInit)?;
        p.touch.init().map_err(FatalError::TouchInit)?;

        let color = self.led.color(self.stopwatch.state());
        self.led.update(color);
        p.led.show(color);
        Ok(())
    }

    pub fn state(&self) -> StopwatchState {
        self.stopwatch.state()
    }

    pub fn elapsed<C: TimeSource>(&self, clock: &C) -> u64 {
        self.stopwatch.elapsed(clock)
    }

    /// Iteration period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Check if the render rate is currently halved
    pub fn is_degraded(&self) -> bool {
        self.renderer.is_degraded()
    }

    /// Run one pass of the loop
    pub fn run_iteration<C, D, T, L, S, M>(
        &mut self,
        p: &mut Peripherals<C, D, T, L, S, M>,
    ) -> IterationReport
    where
        C: TimeSource,
        D: DisplayBackend,
        T: TouchDriver,
        L: StatusLed,
        S: LightSensor,
        M: MemoryReclaimer,
    {
        let started = p.clock.now();
        let mut report = IterationReport::default();

        // 1. Touch feeds the state machine before anything observes state
        match self.sampler.poll(&mut p.touch, &p.clock) {
            Ok(Some(event)) => {
                report.event = Some(event);
                report.touch = self.sampler.last_sample();

                let segment_ms = self.stopwatch.lap(&p.clock);
                report.transition = self.stopwatch.handle(event, &p.clock);
                if report.transition == Some(StopwatchState::Stopped) {
                    report.session = Some(SessionSummary {
                        segment_ms,
                        total_ms: self.stopwatch.elapsed(&p.clock),
                    });
                }
            }
            Ok(None) => {}
            Err(fault) => report.touch_fault = Some(fault),
        }

        // 2. Timing and LED
        self.stopwatch.checkpoint(&p.clock);
        let state = self.stopwatch.state();
        report.led = self.led.color(state);
        report.led_changed = self.led.update(report.led);
        p.led.show(report.led);

        // 3. Render at the capped rate
        let now = p.clock.now();
        if self.renderer.is_due(now) {
            let light = if self.style.show_light {
                match p.light.read_level() {
                    Ok(level) => Some(level),
                    Err(e) => {
                        report.light_fault = Some(e);
                        None
                    }
                }
            } else {
                None
            };
            let elapsed = self.stopwatch.elapsed(&p.clock);
            let frame = DisplayFrame::build(elapsed, state, light, &self.style);
            report.render = self.renderer.render(&mut p.display, now, &frame);
        }

        // 4. Periodic reclamation
        self.iteration = self.iteration.wrapping_add(1);
        if self.iteration % self.gc_interval == 0 {
            let (status, pressure) = self.reclaim(&mut p.memory);
            report.heap = Some(status);
            report.memory_pressure = pressure;
        }

        // 5. Sleep budget
        report.busy_ms = p.clock.elapsed_since(started);
        report.sleep_ms = self.period_ms.saturating_sub(report.busy_ms);
        report
    }

    /// Reclaim, and under pressure drop the scratch raster and slow rendering
    fn reclaim<M: MemoryReclaimer>(&mut self, memory: &mut M) -> (HeapStatus, bool) {
        let status = memory.reclaim();
        if !status.is_under(self.low_water) {
            self.renderer.set_degraded(false);
            return (status, false);
        }

        self.renderer.release_scratch();
        self.renderer.set_degraded(true);
        (memory.reclaim(), true)
    }
}
