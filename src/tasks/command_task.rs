use core::convert::Infallible;

use crate::config::TurretConfig;
use crate::error::LinkError;
use crate::platform::{ByteSource, Indicator, PulseOutput};
use crate::protocol::{CommandPacket, Opcode};
use crate::tasks::Shared;

/// Peripherals handed to the command task
pub struct CommandPorts<L, B, F, P> {
    pub link: L,
    /// Busy/fault indicator, raised as soon as a packet's errors arrive
    pub busy: B,
    /// Lamp toggled around the wait for fire completion
    pub fire_lamp: F,
    /// Recenter handles onto the pan/tilt compare registers
    pub pan: P,
    pub tilt: P,
}

/// Serial front end and single writer of the aim state.
///
/// Reads `[pan][tilt][opcode]` packets one byte at a time and dispatches on
/// the opcode. MOVE is fire-and-forget, FIRE blocks until the fire task
/// reports completion, RECENTER writes the center pulses directly and any
/// other opcode is dropped without a reply.
pub struct CommandTask<'a, L, B, F, P> {
    ports: CommandPorts<L, B, F, P>,
    shared: &'a Shared,
    config: TurretConfig,
}

impl<'a, L, B, F, P> CommandTask<'a, L, B, F, P>
where
    L: ByteSource,
    B: Indicator,
    F: Indicator,
    P: PulseOutput,
{
    pub fn new(ports: CommandPorts<L, B, F, P>, shared: &'a Shared, config: TurretConfig) -> Self {
        Self {
            ports,
            shared,
            config,
        }
    }

    /// Runs until the link reports an error.
    pub async fn run(&mut self) -> Result<Infallible, LinkError> {
        loop {
            self.process_packet().await?;
        }
    }

    /// Reads and dispatches one packet, returning it once dispatch is done.
    pub async fn process_packet(&mut self) -> Result<CommandPacket, LinkError> {
        let pan_error = self.ports.link.read_byte().await? as i8;
        let tilt_error = self.ports.link.read_byte().await? as i8;
        self.ports.busy.set_on();

        // Errors must be in place before any task is woken
        self.shared.aim.publish(pan_error, tilt_error);

        let opcode = Opcode::from(self.ports.link.read_byte().await?);
        match opcode {
            Opcode::Move => self.shared.signals.request_move(),
            Opcode::Fire => {
                self.ports.fire_lamp.toggle();
                self.shared.signals.request_fire();
                self.shared.signals.wait_fire_complete().await;
                self.ports.fire_lamp.toggle();
            }
            Opcode::Recenter => {
                self.ports.pan.set_pulse(self.config.pan.center);
                self.ports.tilt.set_pulse(self.config.tilt.center);
                log_debug!("recenter");
            }
            Opcode::Unknown(byte) => {
                log_debug!("ignoring opcode {}", byte);
            }
        }

        Ok(CommandPacket {
            pan_error,
            tilt_error,
            opcode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AXIS_CENTER;
    use crate::platform::mock::{Bench, MockLamp, MockServo, ScriptedLink};
    use crate::protocol::OP_RECENTER;
    use core::pin::pin;
    use embassy_futures::select::{select, Either};
    use embassy_futures::{block_on, yield_now};

    type BenchCommand<'a> = CommandTask<'a, ScriptedLink<'a>, MockLamp<'a>, MockLamp<'a>, MockServo<'a>>;

    fn command_task<'a>(bench: &'a Bench, shared: &'a Shared) -> BenchCommand<'a> {
        CommandTask::new(
            CommandPorts {
                link: bench.link(),
                busy: bench.busy_line(),
                fire_lamp: bench.fire_lamp_line(),
                pan: bench.pan(),
                tilt: bench.tilt(),
            },
            shared,
            TurretConfig::DEFAULT,
        )
    }

    fn packet(pan_error: i8, tilt_error: i8, opcode: Opcode) -> CommandPacket {
        CommandPacket {
            pan_error,
            tilt_error,
            opcode,
        }
    }

    #[test]
    fn move_publishes_errors_then_signals() {
        let bench = Bench::new();
        let shared = Shared::new();
        bench.push_packet(packet(-42, 17, Opcode::Move));

        let mut task = command_task(&bench, &shared);
        let decoded = block_on(task.process_packet()).unwrap();

        assert_eq!(decoded, packet(-42, 17, Opcode::Move));
        assert_eq!(shared.aim.pan_error(), -42);
        assert_eq!(shared.aim.tilt_error(), 17);
        assert!(shared.signals.move_pending());
        assert!(!shared.signals.fire_pending());
        assert!(bench.busy());
        assert!(bench.sent().is_empty());
    }

    #[test]
    fn recenter_writes_center_directly() {
        let bench = Bench::new();
        let shared = Shared::new();
        bench.set_pulses(700, 160);
        bench.push_bytes(&[5, 5, OP_RECENTER]);

        let mut task = command_task(&bench, &shared);
        block_on(task.process_packet()).unwrap();

        assert_eq!(bench.pan_pulse(), AXIS_CENTER);
        assert_eq!(bench.tilt_pulse(), AXIS_CENTER);
        assert!(!shared.signals.move_pending());
        assert!(bench.sent().is_empty());
    }

    #[test]
    fn unknown_opcodes_are_consumed_silently() {
        let bench = Bench::new();
        let shared = Shared::new();
        bench.set_pulses(300, 600);
        for op in 3..=u8::MAX {
            bench.push_bytes(&[1, 2, op]);
        }

        let mut task = command_task(&bench, &shared);
        for op in 3..=u8::MAX {
            let decoded = block_on(task.process_packet()).unwrap();
            assert_eq!(decoded.opcode, Opcode::Unknown(op));
        }

        assert_eq!(bench.unread(), 0);
        assert_eq!((bench.pan_pulse(), bench.tilt_pulse()), (300, 600));
        assert!(!shared.signals.move_pending());
        assert!(!shared.signals.fire_pending());
        assert!(bench.sent().is_empty());
    }

    #[test]
    fn fire_blocks_until_completion() {
        let bench = Bench::new();
        let shared = Shared::new();
        bench.push_packet(packet(0, 0, Opcode::Fire));
        bench.push_packet(packet(9, 9, Opcode::Move));

        let mut task = command_task(&bench, &shared);
        let mut run = pin!(task.run());

        // Nobody answers the fire request: the task must stay parked
        let parked = block_on(select(run.as_mut(), async {
            for _ in 0..200 {
                yield_now().await;
            }
        }));
        assert!(matches!(parked, Either::Second(())));
        assert_eq!(bench.unread(), 3);
        assert!(shared.signals.fire_pending());
        assert!(bench.fire_lamp());

        // Completion releases it and the next packet is read
        shared.signals.complete_fire();
        let result = block_on(run);
        assert_eq!(result, Err(LinkError::Closed));
        assert_eq!(bench.unread(), 0);
        assert_eq!(shared.aim.pan_error(), 9);
        assert!(!bench.fire_lamp());
        assert_eq!(bench.fire_lamp_toggles(), 2);
    }

    #[test]
    fn truncated_packet_reports_closed_link() {
        let bench = Bench::new();
        let shared = Shared::new();
        bench.push_bytes(&[10, 20]);

        let mut task = command_task(&bench, &shared);
        assert_eq!(block_on(task.process_packet()), Err(LinkError::Closed));
        // Errors were published before the opcode read failed
        assert_eq!(shared.aim.pan_error(), 10);
        assert!(!shared.signals.move_pending());
    }
}
