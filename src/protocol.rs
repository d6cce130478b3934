//! Host ⇄ turret wire protocol.
//!
//! Host → turret: `[pan_error: i8] [tilt_error: i8] [opcode: u8]`, no sync
//! byte, no checksum. Turret → host: a single status byte, sent only on fire
//! completion and on saturation fault.

pub const PACKET_LEN: usize = 3;

pub const OP_MOVE: u8 = 0;
pub const OP_FIRE: u8 = 1;
pub const OP_RECENTER: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub enum Opcode {
    /// Run one PID step on the new errors
    Move,
    /// Pull the trigger and wait for completion
    Fire,
    /// Put pan/tilt back to center, bypassing the PID loop
    Recenter,
    /// Anything else; consumed and ignored
    Unknown(u8),
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        match byte {
            OP_MOVE => Self::Move,
            OP_FIRE => Self::Fire,
            OP_RECENTER => Self::Recenter,
            other => Self::Unknown(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        match op {
            Opcode::Move => OP_MOVE,
            Opcode::Fire => OP_FIRE,
            Opcode::Recenter => OP_RECENTER,
            Opcode::Unknown(byte) => byte,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub struct CommandPacket {
    pub pan_error: i8,
    pub tilt_error: i8,
    pub opcode: Opcode,
}

impl CommandPacket {
    pub fn from_bytes(bytes: [u8; PACKET_LEN]) -> Self {
        Self {
            pan_error: bytes[0] as i8,
            tilt_error: bytes[1] as i8,
            opcode: Opcode::from(bytes[2]),
        }
    }

    pub fn to_bytes(self) -> [u8; PACKET_LEN] {
        [self.pan_error as u8, self.tilt_error as u8, self.opcode.into()]
    }
}

/// Status byte sent back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
#[repr(u8)]
pub enum Response {
    /// Control loop was pinned at a travel limit and has been reset
    Fault = 0,
    /// Trigger pulled
    FireDone = 1,
}

impl Response {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}
