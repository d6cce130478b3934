/// Shared aim state between the command task (writer) and the control task
/// (reader).
///
/// Each error field sits behind its own blocking mutex and every critical
/// section covers a single read or a single write. The pair is therefore not
/// updated atomically: the control task may pair a stale pan with a fresh
/// tilt. Newer writes overwrite older ones; nothing is queued.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

// ── Data types ────────────────────────────────────────────────────────────────

/// Errors as last seen by the control task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub struct AimSnapshot {
    pub pan_error: i8,
    pub tilt_error: i8,
}

pub struct AimState {
    pan_error: Mutex<CriticalSectionRawMutex, Cell<i8>>,
    tilt_error: Mutex<CriticalSectionRawMutex, Cell<i8>>,
}

impl AimState {
    pub const fn new() -> Self {
        Self {
            pan_error: Mutex::new(Cell::new(0)),
            tilt_error: Mutex::new(Cell::new(0)),
        }
    }

    pub fn set_pan_error(&self, error: i8) {
        self.pan_error.lock(|cell| cell.set(error));
    }

    pub fn set_tilt_error(&self, error: i8) {
        self.tilt_error.lock(|cell| cell.set(error));
    }

    pub fn pan_error(&self) -> i8 {
        self.pan_error.lock(|cell| cell.get())
    }

    pub fn tilt_error(&self) -> i8 {
        self.tilt_error.lock(|cell| cell.get())
    }

    /// Pan then tilt, each under its own lock.
    pub fn publish(&self, pan_error: i8, tilt_error: i8) {
        self.set_pan_error(pan_error);
        self.set_tilt_error(tilt_error);
    }

    /// Pan then tilt, each under its own lock.
    pub fn snapshot(&self) -> AimSnapshot {
        let pan_error = self.pan_error();
        let tilt_error = self.tilt_error();
        AimSnapshot {
            pan_error,
            tilt_error,
        }
    }
}

impl Default for AimState {
    fn default() -> Self {
        Self::new()
    }
}
