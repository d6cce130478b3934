use core::cell::RefCell;

use embassy_stm32::gpio::{AnyPin, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::platform::Indicator;

pub type SharedOutput = Mutex<CriticalSectionRawMutex, RefCell<Output<'static, AnyPin>>>;

/// Busy/fault line (PG3) raised by the command and control tasks and
/// cleared by the fire task.
#[derive(Clone, Copy)]
pub struct SharedLine {
    pin: &'static SharedOutput,
}

impl SharedLine {
    pub fn new(pin: &'static SharedOutput) -> Self {
        Self { pin }
    }
}

impl Indicator for SharedLine {
    fn set_on(&mut self) {
        self.pin.lock(|p| p.borrow_mut().set_high());
    }

    fn set_off(&mut self) {
        self.pin.lock(|p| p.borrow_mut().set_low());
    }

    fn toggle(&mut self) {
        self.pin.lock(|p| p.borrow_mut().toggle());
    }
}

/// LED driven by a single task
pub struct Lamp {
    pin: Output<'static, AnyPin>,
}

impl Lamp {
    pub fn new(pin: Output<'static, AnyPin>) -> Self {
        Self { pin }
    }
}

impl Indicator for Lamp {
    fn set_on(&mut self) {
        self.pin.set_high();
    }

    fn set_off(&mut self) {
        self.pin.set_low();
    }

    fn toggle(&mut self) {
        self.pin.toggle();
    }
}
