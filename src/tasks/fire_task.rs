use crate::config::FirePulses;
use crate::platform::{Indicator, PulseOutput, ResponseSink};
use crate::protocol::Response;
use crate::tasks::Shared;

/// Peripherals handed to the fire task
pub struct FirePorts<T, B, R> {
    pub trigger: T,
    pub busy: B,
    pub responses: R,
}

/// Pulls the trigger servo and acknowledges the host.
///
/// Runs above the other two tasks so a shot is not held up by a PID step.
/// The trigger is left at its active pulse; returning it to rest is up to the
/// mechanism.
pub struct FireTask<'a, T, B, R> {
    ports: FirePorts<T, B, R>,
    pulses: FirePulses,
    shared: &'a Shared,
}

impl<'a, T, B, R> FireTask<'a, T, B, R>
where
    T: PulseOutput,
    B: Indicator,
    R: ResponseSink,
{
    pub fn new(ports: FirePorts<T, B, R>, shared: &'a Shared, pulses: FirePulses) -> Self {
        Self {
            ports,
            pulses,
            shared,
        }
    }

    /// Puts the trigger at rest. Called once at start-up.
    pub fn arm(&mut self) {
        self.ports.trigger.set_pulse(self.pulses.rest);
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.fire_once().await;
        }
    }

    pub async fn fire_once(&mut self) {
        self.shared.signals.wait_fire().await;

        self.ports.trigger.set_pulse(self.pulses.active);
        self.ports.busy.set_off();
        if let Err(e) = self.ports.responses.send(Response::FireDone).await {
            log_error!("fire response not sent: {:?}", e);
        }
        log_info!("fired");

        self.shared.signals.complete_fire();
    }
}
