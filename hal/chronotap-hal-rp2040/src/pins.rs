//! Dynamic pin allocation for config-driven hardware setup
//!
//! Pins named in `stopwatch.toml` are taken from the bank by number at
//! boot. The SPI bus pins are fixed by the board and never enter the bank.

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::{ADC, PIN_10, PIN_11, PIN_12, PIN_26, PIN_27, PIN_28, PIN_29, SPI1};
use embassy_rp::{Peri, Peripherals};

use crate::adc::AdcChannel;
use crate::gpio::GPIO_COUNT;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the SPI bus
    Reserved,
    /// Pin has no ADC input
    NotAdcCapable,
}

/// SPI bus pins wired on the board
pub const SPI_BUS_PINS: [u8; 3] = [10, 11, 12];

/// Peripherals with fixed board wiring, handed out alongside the bank
pub struct BoardPeripherals {
    pub spi: Peri<'static, SPI1>,
    pub sck: Peri<'static, PIN_10>,
    pub mosi: Peri<'static, PIN_11>,
    pub miso: Peri<'static, PIN_12>,
    pub adc: Peri<'static, ADC>,
}

/// Pin bank that holds the free GPIO pins and allows taking them by number
pub struct PinBank {
    /// GPIO 0-25; bus pins are `None` from the start
    pins: [Option<Peri<'static, AnyPin>>; 26],
    adc0: Option<Peri<'static, PIN_26>>,
    adc1: Option<Peri<'static, PIN_27>>,
    adc2: Option<Peri<'static, PIN_28>>,
    adc3: Option<Peri<'static, PIN_29>>,
}

impl PinBank {
    /// Split the embassy peripherals into the bank and the fixed-wiring set
    pub fn from_peripherals(p: Peripherals) -> (Self, BoardPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                None,
                None,
                None,
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
            ],
            adc0: Some(p.PIN_26),
            adc1: Some(p.PIN_27),
            adc2: Some(p.PIN_28),
            adc3: Some(p.PIN_29),
        };
        let board = BoardPeripherals {
            spi: p.SPI1,
            sck: p.PIN_10,
            mosi: p.PIN_11,
            miso: p.PIN_12,
            adc: p.ADC,
        };
        (bank, board)
    }

    /// Take a pin by number as a plain GPIO
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if SPI_BUS_PINS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        let pin = match AdcChannel::from_gpio(pin_num) {
            Some(AdcChannel::Adc0) => self.adc0.take().map(Into::into),
            Some(AdcChannel::Adc1) => self.adc1.take().map(Into::into),
            Some(AdcChannel::Adc2) => self.adc2.take().map(Into::into),
            Some(AdcChannel::Adc3) => self.adc3.take().map(Into::into),
            None => self.pins[pin_num as usize].take(),
        };
        pin.ok_or(PinError::AlreadyTaken)
    }

    /// Take an ADC-capable pin as an analog input channel
    pub fn take_adc(&mut self, pin_num: u8) -> Result<Channel<'static>, PinError> {
        let channel = match AdcChannel::from_gpio(pin_num) {
            Some(AdcChannel::Adc0) => self.adc0.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc1) => self.adc1.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc2) => self.adc2.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc3) => self.adc3.take().map(|p| Channel::new_pin(p, Pull::None)),
            None => return Err(PinError::NotAdcCapable),
        };
        channel.ok_or(PinError::AlreadyTaken)
    }
}
