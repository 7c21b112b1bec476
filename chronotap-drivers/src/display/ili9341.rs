//! ILI9341 320x240 TFT over SPI
//!
//! Landscape orientation, 16-bit RGB565 pixels. Commands are sent with the
//! D/C line low and their parameters with it high.

use chronotap_display::{DisplayBackend, DisplayError, Rect};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::IntoStorage;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Panel size in landscape
pub const WIDTH: u16 = 320;
pub const HEIGHT: u16 = 240;

mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;
}

/// MADCTL: row/column exchange (landscape) with BGR panel order
const MADCTL_LANDSCAPE_BGR: u8 = 0x20 | 0x08;

/// 16 bits per pixel
const PIXFMT_RGB565: u8 = 0x55;

/// Pixels converted per bus write
const CHUNK_PIXELS: usize = 64;

/// ILI9341 driver
pub struct Ili9341<SPI, DC, RST, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: DELAY,
    initialized: bool,
}

impl<SPI, DC, RST, DELAY> Ili9341<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            initialized: false,
        }
    }

    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.spi
                .write(params)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    fn set_window(&mut self, area: Rect) -> Result<(), DisplayError> {
        let [x0h, x0l] = area.x.to_be_bytes();
        let [x1h, x1l] = area.right().to_be_bytes();
        let [y0h, y0l] = area.y.to_be_bytes();
        let [y1h, y1l] = area.bottom().to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        let mut buf = [0u8; CHUNK_PIXELS * 2];
        for chunk in pixels.chunks(CHUNK_PIXELS) {
            for (bytes, pixel) in buf.chunks_exact_mut(2).zip(chunk) {
                bytes.copy_from_slice(&pixel.into_storage().to_be_bytes());
            }
            self.spi
                .write(&buf[..chunk.len() * 2])
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, DELAY> DisplayBackend for Ili9341<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        // Hardware reset
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);
        self.command(cmd::PIXFMT, &[PIXFMT_RGB565])?;
        self.command(cmd::MADCTL, &[MADCTL_LANDSCAPE_BGR])?;
        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);

        self.initialized = true;
        Ok(())
    }

    fn draw_region(&mut self, area: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.check_region(area, pixels)?;
        self.set_window(area)?;
        self.write_pixels(pixels)
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mock::{Bus, MockPin, MockSpi, NoDelay};
    use embedded_graphics::pixelcolor::RgbColor;
    use std::rc::Rc;
    use std::vec;

    fn panel(bus: &Rc<Bus>) -> Ili9341<MockSpi, crate::mock::DcPin, MockPin, NoDelay> {
        Ili9341::new(
            MockSpi { bus: bus.clone() },
            MockPin::dc(bus),
            MockPin::new(),
            NoDelay,
        )
    }

    #[test]
    fn test_init_sequence() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        lcd.init().unwrap();
        assert!(lcd.rst.is_high());
        assert_eq!(
            bus.commands(),
            vec![cmd::SWRESET, cmd::SLPOUT, cmd::PIXFMT, cmd::MADCTL, cmd::DISPON]
        );
        assert_eq!(bus.params_after(cmd::PIXFMT), Some(vec![0x55]));
        assert_eq!(bus.params_after(cmd::MADCTL), Some(vec![0x28]));
    }

    #[test]
    fn test_draw_before_init_rejected() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        assert_eq!(
            lcd.draw_region(Rect::new(0, 0, 1, 1), &[Rgb565::RED]),
            Err(DisplayError::NotInitialized)
        );
        assert!(bus.log.borrow().is_empty());
    }

    #[test]
    fn test_draw_region_sets_window_and_streams_pixels() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        lcd.init().unwrap();
        bus.log.borrow_mut().clear();

        let area = Rect::new(300, 200, 2, 1);
        lcd.draw_region(area, &[Rgb565::RED, Rgb565::BLUE]).unwrap();

        assert_eq!(bus.params_after(cmd::CASET), Some(vec![0x01, 0x2C, 0x01, 0x2D]));
        assert_eq!(bus.params_after(cmd::PASET), Some(vec![0x00, 200, 0x00, 200]));
        assert_eq!(
            bus.params_after(cmd::RAMWR),
            Some(vec![0xF8, 0x00, 0x00, 0x1F])
        );
    }

    #[test]
    fn test_large_region_is_chunked() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        lcd.init().unwrap();
        bus.log.borrow_mut().clear();

        let pixels = vec![Rgb565::WHITE; 100];
        lcd.draw_region(Rect::new(0, 0, 100, 1), &pixels).unwrap();
        let data: usize = bus
            .log
            .borrow()
            .iter()
            .skip_while(|(dc, b)| *dc || b.as_slice() != [cmd::RAMWR])
            .skip(1)
            .map(|(_, b)| b.len())
            .sum();
        assert_eq!(data, 200);
    }

    #[test]
    fn test_bus_error_is_communication() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        bus.fail.set(true);
        assert_eq!(lcd.init(), Err(DisplayError::Communication));
    }

    #[test]
    fn test_off_panel_region_rejected() {
        let bus = Bus::new();
        let mut lcd = panel(&bus);
        lcd.init().unwrap();
        assert_eq!(
            lcd.draw_region(Rect::new(319, 0, 2, 1), &[Rgb565::RED; 2]),
            Err(DisplayError::InvalidCoordinates)
        );
    }
}
