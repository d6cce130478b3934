//! Error types
//!
//! The control core has almost no error surface: saturation faults are handled
//! inside the control task and unknown opcodes are ignored. What remains are
//! serial link failures and configuration mistakes.

use core::fmt;

/// Serial link errors reported by a [`crate::platform::ByteSource`] or
/// [`crate::platform::ResponseSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub enum LinkError {
    /// The port is gone; no more bytes will ever arrive
    Closed,
    /// Receiver overrun, a byte was lost
    Overrun,
    /// Framing error on the line
    Framing,
    /// Noise detected on the line
    Noise,
    /// Parity error
    Parity,
    /// Transmit failed
    Write,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "serial link closed"),
            Self::Overrun => write!(f, "receiver overrun"),
            Self::Framing => write!(f, "framing error"),
            Self::Noise => write!(f, "line noise"),
            Self::Parity => write!(f, "parity error"),
            Self::Write => write!(f, "transmit failed"),
        }
    }
}

impl LinkError {
    /// Line errors corrupt a byte but leave the port usable.
    pub fn is_line_error(self) -> bool {
        matches!(self, Self::Overrun | Self::Framing | Self::Noise | Self::Parity)
    }
}

/// Rejected [`crate::config::TurretConfig`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub enum ConfigError {
    /// Axis `min` is above `max`
    InvertedLimits,
    /// Axis center lies outside `[min, max]`
    CenterOutOfRange,
    /// Saturation budget of zero would fault on the first step
    ZeroSaturationBudget,
    /// Sample period must be positive and finite
    InvalidSamplePeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedLimits => write!(f, "axis min is greater than max"),
            Self::CenterOutOfRange => write!(f, "axis center outside its limits"),
            Self::ZeroSaturationBudget => write!(f, "saturation budget must be non-zero"),
            Self::InvalidSamplePeriod => write!(f, "sample period must be positive"),
        }
    }
}
