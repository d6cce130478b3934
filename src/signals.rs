//! Rendezvous signals between the three tasks.
//!
//! Each signal holds at most one pending activation. Raising one that is
//! already pending changes nothing, so a burst of MOVE packets collapses into
//! a single PID step on the latest errors. The two per-field locks that
//! complete the set live in [`crate::state::AimState`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

pub type Rendezvous = Signal<CriticalSectionRawMutex, ()>;

pub struct SignalSet {
    start_move: Rendezvous,
    start_fire: Rendezvous,
    fire_complete: Rendezvous,
}

impl SignalSet {
    pub const fn new() -> Self {
        Self {
            start_move: Signal::new(),
            start_fire: Signal::new(),
            fire_complete: Signal::new(),
        }
    }

    /// Command task → control task. Never blocks.
    pub fn request_move(&self) {
        self.start_move.signal(());
    }

    pub async fn wait_move(&self) {
        self.start_move.wait().await
    }

    /// Command task → fire task. Never blocks.
    pub fn request_fire(&self) {
        self.start_fire.signal(());
    }

    pub async fn wait_fire(&self) {
        self.start_fire.wait().await
    }

    /// Fire task → command task
    pub fn complete_fire(&self) {
        self.fire_complete.signal(());
    }

    pub async fn wait_fire_complete(&self) {
        self.fire_complete.wait().await
    }

    pub fn move_pending(&self) -> bool {
        self.start_move.signaled()
    }

    pub fn fire_pending(&self) -> bool {
        self.start_fire.signaled()
    }

    pub fn fire_complete_pending(&self) -> bool {
        self.fire_complete.signaled()
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn repeated_requests_saturate_at_one() {
        let signals = SignalSet::new();
        signals.request_move();
        signals.request_move();
        signals.request_move();

        block_on(signals.wait_move());
        assert!(!signals.move_pending());
    }

    #[test]
    fn signals_are_independent() {
        let signals = SignalSet::new();
        signals.request_fire();
        assert!(signals.fire_pending());
        assert!(!signals.move_pending());
        assert!(!signals.fire_complete_pending());

        block_on(signals.wait_fire());
        signals.complete_fire();
        block_on(signals.wait_fire_complete());
        assert!(!signals.fire_pending());
        assert!(!signals.fire_complete_pending());
    }
}
