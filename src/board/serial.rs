//! USART3 (ST-LINK virtual COM port) command link.

use embassy_stm32::peripherals::{DMA1_CH1, DMA1_CH3, USART3};
use embassy_stm32::usart::{self, RingBufferedUartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use crate::error::LinkError;
use crate::platform::{ByteSource, ResponseSink};
use crate::protocol::Response;

pub const HOST_BAUD: u32 = 115_200;

pub type HostUartTx = UartTx<'static, USART3, DMA1_CH3>;

impl From<usart::Error> for LinkError {
    fn from(e: usart::Error) -> Self {
        match e {
            usart::Error::Framing => Self::Framing,
            usart::Error::Noise => Self::Noise,
            usart::Error::Overrun => Self::Overrun,
            usart::Error::Parity => Self::Parity,
            _ => Self::Write,
        }
    }
}

/// DMA ring-buffered receiver. Line errors are logged and reading resumes,
/// so only a dead port ever surfaces as an error.
pub struct HostRx {
    rx: RingBufferedUartRx<'static, USART3, DMA1_CH1>,
}

impl HostRx {
    pub fn new(rx: RingBufferedUartRx<'static, USART3, DMA1_CH1>) -> Self {
        Self { rx }
    }
}

impl ByteSource for HostRx {
    async fn read_byte(&mut self) -> Result<u8, LinkError> {
        let mut byte = [0u8; 1];
        loop {
            match self.rx.read(&mut byte).await {
                Ok(0) => continue,
                Ok(_) => return Ok(byte[0]),
                Err(e) => {
                    let e = LinkError::from(e);
                    if !e.is_line_error() {
                        return Err(e);
                    }
                    crate::log_warn!("host link: {:?}, byte dropped", e);
                }
            }
        }
    }
}

/// Transmitter shared by the control and fire tasks
#[derive(Clone, Copy)]
pub struct HostTx {
    tx: &'static Mutex<CriticalSectionRawMutex, HostUartTx>,
}

impl HostTx {
    pub fn new(tx: &'static Mutex<CriticalSectionRawMutex, HostUartTx>) -> Self {
        Self { tx }
    }
}

impl ResponseSink for HostTx {
    async fn send(&mut self, response: Response) -> Result<(), LinkError> {
        let mut tx = self.tx.lock().await;
        tx.write(&[response.as_byte()]).await.map_err(|_| LinkError::Write)
    }
}
