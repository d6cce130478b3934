use crate::config::TurretConfig;
use crate::drivers::pid::{PanTiltPid, StepOutcome};
use crate::platform::{Indicator, PulseOutput, ResponseSink};
use crate::protocol::Response;
use crate::tasks::Shared;

/// Peripherals handed to the control task
pub struct ControlPorts<P, B, R> {
    pub pan: P,
    pub tilt: P,
    pub busy: B,
    pub responses: R,
}

/// One PID step per start-move activation.
///
/// Owns the PID state and the pan/tilt outputs. When the saturation budget
/// runs out the loop is reset to center, the indicator is raised and a single
/// fault byte goes to the host; the task then simply waits for the next MOVE.
pub struct ControlTask<'a, P, B, R> {
    ports: ControlPorts<P, B, R>,
    pid: PanTiltPid,
    shared: &'a Shared,
}

impl<'a, P, B, R> ControlTask<'a, P, B, R>
where
    P: PulseOutput,
    B: Indicator,
    R: ResponseSink,
{
    pub fn new(ports: ControlPorts<P, B, R>, shared: &'a Shared, config: &TurretConfig) -> Self {
        Self {
            ports,
            pid: PanTiltPid::new(config),
            shared,
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step_once().await;
        }
    }

    /// Waits for start-move, then runs and applies one step.
    pub async fn step_once(&mut self) -> StepOutcome {
        self.shared.signals.wait_move().await;
        let aim = self.shared.aim.snapshot();

        let outcome = self.pid.step(aim);
        match outcome {
            StepOutcome::Drive { pan, tilt } => {
                self.ports.pan.set_pulse(pan);
                self.ports.tilt.set_pulse(tilt);
            }
            StepOutcome::Fault => {
                log_warn!(
                    "saturation fault (pan err {}, tilt err {}), loop reset",
                    aim.pan_error,
                    aim.tilt_error
                );
                self.ports.busy.set_on();
                if let Err(e) = self.ports.responses.send(Response::Fault).await {
                    log_error!("fault response not sent: {:?}", e);
                }
            }
        }
        outcome
    }

    pub fn pid(&self) -> &PanTiltPid {
        &self.pid
    }
}
