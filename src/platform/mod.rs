//! Hardware seams of the control core.
//!
//! Tasks receive their peripherals through these traits at construction, so
//! each task owns exactly the outputs it drives. The firmware implements them
//! on embassy-stm32 peripherals (`board` module); tests implement them on
//! in-memory cells.

use crate::error::LinkError;
use crate::protocol::Response;

/// Receiving half of the command link
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    /// Wait for the next byte. Blocks indefinitely.
    async fn read_byte(&mut self) -> Result<u8, LinkError>;
}

/// Transmitting half of the command link
#[allow(async_fn_in_trait)]
pub trait ResponseSink {
    async fn send(&mut self, response: Response) -> Result<(), LinkError>;
}

/// One PWM compare channel, in timer ticks
pub trait PulseOutput {
    fn set_pulse(&mut self, ticks: u16);
}

/// A digital status line (busy/fault indicator, LEDs)
pub trait Indicator {
    fn set_on(&mut self);
    fn set_off(&mut self);
    fn toggle(&mut self);
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    async fn read_byte(&mut self) -> Result<u8, LinkError> {
        (**self).read_byte().await
    }
}

impl<T: ResponseSink + ?Sized> ResponseSink for &mut T {
    async fn send(&mut self, response: Response) -> Result<(), LinkError> {
        (**self).send(response).await
    }
}

impl<T: PulseOutput + ?Sized> PulseOutput for &mut T {
    fn set_pulse(&mut self, ticks: u16) {
        (**self).set_pulse(ticks)
    }
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn set_on(&mut self) {
        (**self).set_on()
    }

    fn set_off(&mut self) {
        (**self).set_off()
    }

    fn toggle(&mut self) {
        (**self).toggle()
    }
}

#[cfg(test)]
pub mod mock;
