//! Chronotap - Touchscreen Stopwatch Firmware
//!
//! Main firmware binary for RP2040 boards with an ILI9341 panel and an
//! XPT2046 touch controller on a shared SPI bus.
//!
//! Everything runs in one cooperative loop: sample touch, advance the
//! stopwatch, drive the LED, redraw what changed, sleep out the period.

#![no_std]
#![no_main]

extern crate alloc;

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_time::{Delay, Timer};
use embedded_alloc::LlffHeap as Heap;
use embedded_hal_bus::spi::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chronotap_core::config::{parse_config, StopwatchConfig};
use chronotap_core::led::{diagnostic_color, DIAGNOSTIC_HALF_PERIOD_MS};
use chronotap_core::scheduler::{IterationReport, Peripherals, Scheduler};
use chronotap_core::time::TimeSource;
use chronotap_core::traits::StatusLed;
use chronotap_drivers::display::Ili9341;
use chronotap_drivers::led::RgbLed;
use chronotap_drivers::sensor::LdrSensor;
use chronotap_drivers::touch::Xpt2046;
use chronotap_hal_rp2040::pins::SPI_BUS_PINS;
use chronotap_hal_rp2040::{GpioAllocator, PinBank};

use crate::board::{AdcInput, BoardClock, HeapMonitor};

mod board;

// Heap allocator for the renderer's scratch raster
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB (largest region raster is 240x20 pixels, ~9.4KB)
const HEAP_SIZE: usize = 32 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit stopwatch.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../stopwatch.toml");

/// Shared bus clock; the XPT2046 tops out at 2.5MHz
const SPI_FREQUENCY_HZ: u32 = 2_000_000;

type SpiBus = Spi<'static, SPI1, Blocking>;
type BusDevice = RefCellDevice<'static, SpiBus, Output<'static>, Delay>;

static CONFIG: StaticCell<StopwatchConfig> = StaticCell::new();
static SPI_BUS: StaticCell<RefCell<SpiBus>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Chronotap firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    let (mut bank, board) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    let config: &'static StopwatchConfig = CONFIG.init(load_config());

    // Reject conflicting assignments before any pin is driven
    let mut gpio = GpioAllocator::with_reserved(&SPI_BUS_PINS);
    if let Err(conflict) = gpio.claim_config(config) {
        error!(
            "Pin conflict: {} (gpio{}): {}",
            conflict.name, conflict.pin, conflict.error
        );
        halt().await;
    }

    let pins = &config.pins;

    // Shared SPI bus: display and touch controller each own a chip select
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking(board.spi, board.sck, board.mosi, board.miso, spi_config);
    let bus: &'static RefCell<SpiBus> = SPI_BUS.init(RefCell::new(spi));

    let display_cs = Output::new(bank.take(pins.display_cs.pin).unwrap(), Level::High);
    let touch_cs = Output::new(bank.take(pins.touch_cs.pin).unwrap(), Level::High);
    let display_spi: BusDevice = RefCellDevice::new(bus, display_cs, Delay).unwrap();
    let touch_spi: BusDevice = RefCellDevice::new(bus, touch_cs, Delay).unwrap();

    let dc = Output::new(bank.take(pins.display_dc.pin).unwrap(), Level::Low);
    let rst = Output::new(bank.take(pins.display_rst.pin).unwrap(), Level::High);
    let backlight_on = if pins.backlight.inverted {
        Level::Low
    } else {
        Level::High
    };
    // Held for the life of the program
    let _backlight = Output::new(bank.take(pins.backlight.pin).unwrap(), backlight_on);
    info!("SPI bus initialized ({} Hz)", SPI_FREQUENCY_HZ);

    // Built even when disabled so the init-failure blink has an output
    let led_off = if config.led.is_active_low() {
        Level::High
    } else {
        Level::Low
    };
    let led = RgbLed::new(
        Output::new(bank.take(config.led.red.pin).unwrap(), led_off),
        Output::new(bank.take(config.led.green.pin).unwrap(), led_off),
        Output::new(bank.take(config.led.blue.pin).unwrap(), led_off),
        config.led.is_active_low(),
    );

    let adc = Adc::new_blocking(board.adc, AdcConfig::default());
    let channel = bank.take_adc(pins.light_sensor.pin).unwrap();
    let light = LdrSensor::new(
        AdcInput::new(adc, channel),
        pins.light_sensor.inverted,
        config.display.light_samples,
    );

    let mut peripherals = Peripherals {
        clock: BoardClock,
        display: Ili9341::new(display_spi, dc, rst, Delay),
        touch: Xpt2046::new(touch_spi),
        led,
        light,
        memory: HeapMonitor::new(&HEAP),
    };

    let mut scheduler = Scheduler::new(config);
    if let Err(e) = scheduler.init(&mut peripherals) {
        error!("Hardware init failed: {}", e);
        diagnostic_loop(&peripherals.clock, &mut peripherals.led).await;
    }

    info!(
        "Stopwatch ready: {}ms period, {}ms render interval",
        scheduler.period_ms(),
        config.display.update_interval_ms
    );

    loop {
        let report = scheduler.run_iteration(&mut peripherals);
        log_report(&report);
        Timer::after_millis(report.sleep_ms as u64).await;
    }
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded config, falling back to built-in defaults
fn load_config() -> StopwatchConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            warn!("Invalid stopwatch.toml ({}), using defaults", e);
            StopwatchConfig::default()
        }
    }
}

fn log_report(report: &IterationReport) {
    if let Some(event) = report.event {
        let action = if event.is_press() { "pressed" } else { "released" };
        match report.touch {
            Some(touch) => debug!(
                "Button {} {} at ({}, {}) t={}ms",
                event.button().name(),
                action,
                touch.x,
                touch.y,
                touch.tick.as_millis()
            ),
            None => debug!("Button {} {}", event.button().name(), action),
        }
    }
    if let Some(state) = report.transition {
        debug!("State -> {}", state.label());
    }
    if let Some(session) = report.session {
        info!(
            "Session time: {}ms, total: {}ms",
            session.segment_ms, session.total_ms
        );
    }
    if report.led_changed {
        debug!("LED -> {}", report.led);
    }
    if let Some(fault) = report.touch_fault {
        warn!("Touch sample dropped: {}", fault);
    }
    if let Some(e) = report.light_fault {
        warn!("Light sensor read failed: {}", e);
    }
    if let Some(render) = report.render {
        trace!("Rendered {} regions", render.regions);
        if let Some(e) = render.last_error {
            warn!("{} region writes failed: {}", render.failed, e);
        }
    }
    if let Some(heap) = report.heap {
        trace!("Heap: {} used, {} free", heap.used, heap.free);
    }
    if report.memory_pressure {
        warn!("Low memory, render rate halved");
    }
}

/// Blink the LED red forever after a fatal init failure
async fn diagnostic_loop<C: TimeSource, L: StatusLed>(clock: &C, led: &mut L) -> ! {
    loop {
        led.show(diagnostic_color(clock.now()));
        Timer::after_millis(DIAGNOSTIC_HALF_PERIOD_MS as u64).await;
    }
}

/// Park after a configuration error
async fn halt() -> ! {
    loop {
        Timer::after_secs(1).await;
    }
}
