//! The three cooperating tasks and the state they share.
//!
//! The task bodies are generic over the [`crate::platform`] traits; the
//! firmware binary wraps each in an `#[embassy_executor::task]` with concrete
//! peripheral types.

pub mod command_task;
pub mod control_task;
pub mod fire_task;

pub use command_task::{CommandPorts, CommandTask};
pub use control_task::{ControlPorts, ControlTask};
pub use fire_task::{FirePorts, FireTask};

use crate::signals::SignalSet;
use crate::state::AimState;

/// Process-lifetime state shared by all three tasks
pub struct Shared {
    pub aim: AimState,
    pub signals: SignalSet,
}

impl Shared {
    pub const fn new() -> Self {
        Self {
            aim: AimState::new(),
            signals: SignalSet::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}
