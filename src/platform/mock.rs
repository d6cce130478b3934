//! In-memory peripherals for host tests
//!
//! A [`Bench`] owns every cell; the handles it hands out are cheap copies that
//! point back into it, so several tasks can be wired to the same "register"
//! (the command task's recenter handle and the control task's axis output).

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use embassy_futures::yield_now;

use super::{ByteSource, Indicator, PulseOutput, ResponseSink};
use crate::error::LinkError;
use crate::protocol::{CommandPacket, Response};

/// Polls a drained link waits before reporting [`LinkError::Closed`], long
/// enough for the other tasks to settle.
const IDLE_POLLS: usize = 64;

#[derive(Default)]
pub struct Bench {
    rx: RefCell<VecDeque<u8>>,
    tx: RefCell<Vec<u8>>,
    pan: Cell<u16>,
    tilt: Cell<u16>,
    trigger: Cell<u16>,
    busy: Cell<bool>,
    fire_lamp: Cell<bool>,
    fire_lamp_toggles: Cell<u32>,
}

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_packet(&self, packet: CommandPacket) {
        self.rx.borrow_mut().extend(packet.to_bytes());
    }

    pub fn push_bytes(&self, bytes: &[u8]) {
        self.rx.borrow_mut().extend(bytes.iter().copied());
    }

    pub fn unread(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn sent(&self) -> Vec<u8> {
        self.tx.borrow().clone()
    }

    pub fn pan_pulse(&self) -> u16 {
        self.pan.get()
    }

    pub fn tilt_pulse(&self) -> u16 {
        self.tilt.get()
    }

    pub fn trigger_pulse(&self) -> u16 {
        self.trigger.get()
    }

    pub fn busy(&self) -> bool {
        self.busy.get()
    }

    pub fn fire_lamp(&self) -> bool {
        self.fire_lamp.get()
    }

    pub fn fire_lamp_toggles(&self) -> u32 {
        self.fire_lamp_toggles.get()
    }

    pub fn set_pulses(&self, pan: u16, tilt: u16) {
        self.pan.set(pan);
        self.tilt.set(tilt);
    }

    /// Link that hands out every queued byte immediately
    pub fn link(&self) -> ScriptedLink<'_> {
        ScriptedLink {
            rx: &self.rx,
            paced: false,
            idle: 0,
        }
    }

    /// Link that yields to the other tasks before every byte, like a real
    /// UART at 115200 baud would
    pub fn paced_link(&self) -> ScriptedLink<'_> {
        ScriptedLink {
            rx: &self.rx,
            paced: true,
            idle: 0,
        }
    }

    pub fn responses(&self) -> RecordingSink<'_> {
        RecordingSink { tx: &self.tx }
    }

    pub fn pan(&self) -> MockServo<'_> {
        MockServo(&self.pan)
    }

    pub fn tilt(&self) -> MockServo<'_> {
        MockServo(&self.tilt)
    }

    pub fn trigger(&self) -> MockServo<'_> {
        MockServo(&self.trigger)
    }

    pub fn busy_line(&self) -> MockLamp<'_> {
        MockLamp {
            state: &self.busy,
            toggles: None,
        }
    }

    pub fn fire_lamp_line(&self) -> MockLamp<'_> {
        MockLamp {
            state: &self.fire_lamp,
            toggles: Some(&self.fire_lamp_toggles),
        }
    }
}

pub struct ScriptedLink<'a> {
    rx: &'a RefCell<VecDeque<u8>>,
    paced: bool,
    idle: usize,
}

impl ByteSource for ScriptedLink<'_> {
    async fn read_byte(&mut self) -> Result<u8, LinkError> {
        if self.paced {
            yield_now().await;
        }
        loop {
            let next = self.rx.borrow_mut().pop_front();
            if let Some(byte) = next {
                self.idle = 0;
                return Ok(byte);
            }
            if self.idle >= IDLE_POLLS {
                return Err(LinkError::Closed);
            }
            self.idle += 1;
            yield_now().await;
        }
    }
}

#[derive(Clone, Copy)]
pub struct RecordingSink<'a> {
    tx: &'a RefCell<Vec<u8>>,
}

impl ResponseSink for RecordingSink<'_> {
    async fn send(&mut self, response: Response) -> Result<(), LinkError> {
        self.tx.borrow_mut().push(response.as_byte());
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct MockServo<'a>(&'a Cell<u16>);

impl PulseOutput for MockServo<'_> {
    fn set_pulse(&mut self, ticks: u16) {
        self.0.set(ticks);
    }
}

#[derive(Clone, Copy)]
pub struct MockLamp<'a> {
    state: &'a Cell<bool>,
    toggles: Option<&'a Cell<u32>>,
}

impl Indicator for MockLamp<'_> {
    fn set_on(&mut self) {
        self.state.set(true);
    }

    fn set_off(&mut self) {
        self.state.set(false);
    }

    fn toggle(&mut self) {
        self.state.set(!self.state.get());
        if let Some(toggles) = self.toggles {
            toggles.set(toggles.get() + 1);
        }
    }
}
