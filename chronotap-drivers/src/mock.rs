//! Bus and pin mocks shared by the driver tests

extern crate std;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, Operation, SpiDevice};

/// State shared between the mock bus and its control pins
#[derive(Default)]
pub struct Bus {
    /// Level of the data/command line at the time of each write
    pub dc: Cell<bool>,
    /// Every write as (dc level, bytes)
    pub log: RefCell<Vec<(bool, Vec<u8>)>>,
    /// 12-bit conversions returned by successive transfers
    pub conversions: RefCell<VecDeque<u16>>,
    pub fail: Cell<bool>,
}

impl Bus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Data bytes written after a given command byte
    pub fn params_after(&self, cmd: u8) -> Option<Vec<u8>> {
        let log = self.log.borrow();
        let idx = log.iter().position(|(dc, b)| !*dc && b.as_slice() == [cmd])?;
        log.get(idx + 1)
            .filter(|(dc, _)| *dc)
            .map(|(_, bytes)| bytes.clone())
    }

    /// Command bytes in the order they were sent
    pub fn commands(&self) -> Vec<u8> {
        self.log
            .borrow()
            .iter()
            .filter(|(dc, _)| !*dc)
            .flat_map(|(_, b)| b.iter().copied())
            .collect()
    }
}

#[derive(Debug)]
pub struct MockError;

impl spi::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockSpi {
    pub bus: Rc<Bus>,
}

impl spi::ErrorType for MockSpi {
    type Error = MockError;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockError> {
        if self.bus.fail.get() {
            return Err(MockError);
        }
        let dc = self.bus.dc.get();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => self.bus.log.borrow_mut().push((dc, bytes.to_vec())),
                Operation::Transfer(read, write) => {
                    self.bus.log.borrow_mut().push((dc, write.to_vec()));
                    let value = self.bus.conversions.borrow_mut().pop_front().unwrap_or(0);
                    let raw = value << 3;
                    read.fill(0);
                    if read.len() >= 3 {
                        read[1] = (raw >> 8) as u8;
                        read[2] = raw as u8;
                    }
                }
                Operation::Read(read) | Operation::TransferInPlace(read) => read.fill(0),
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

/// Output pin tracking its level in a shared cell
pub struct MockPin {
    pub level: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            level: Rc::new(Cell::new(false)),
        }
    }

    /// Pin that drives the bus's data/command line
    pub fn dc(bus: &Rc<Bus>) -> DcPin {
        DcPin { bus: bus.clone() }
    }

    pub fn is_high(&self) -> bool {
        self.level.get()
    }
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level.set(true);
        Ok(())
    }
}

pub struct DcPin {
    bus: Rc<Bus>,
}

impl digital::ErrorType for DcPin {
    type Error = Infallible;
}

impl OutputPin for DcPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.bus.dc.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.bus.dc.set(true);
        Ok(())
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
