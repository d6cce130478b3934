use embassy_stm32::gpio::OutputType;
use embassy_stm32::pac;
use embassy_stm32::peripherals::{PA6, PC8, PC9, TIM3};
use embassy_stm32::time::hz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::{Channel, CountingMode};

use super::TIM3_CLOCK_HZ;
use crate::config::TurretConfig;
use crate::platform::PulseOutput;

/// Servo tick rate: 6000 ticks per 20 ms frame
const SERVO_TICK_HZ: u32 = 300_000;
const SERVO_FRAME_TICKS: u16 = 6000;

/// TIM3 driving the three servos at 50 Hz.
///
/// CH1 (PA6) tilt, CH3 (PC8) pan, CH4 (PC9) trigger.
pub struct ServoTimer {
    _pwm: SimplePwm<'static, TIM3>,
}

/// Channel handles; each task gets the ones it drives
pub struct ServoChannels {
    pub pan: ServoChannel,
    pub tilt: ServoChannel,
    pub trigger: ServoChannel,
    /// Second handles onto pan/tilt for the command task's RECENTER
    pub pan_recenter: ServoChannel,
    pub tilt_recenter: ServoChannel,
}

impl ServoTimer {
    pub fn new(tim: TIM3, tilt: PA6, pan: PC8, trigger: PC9, config: &TurretConfig) -> Self {
        let mut pwm = SimplePwm::new(
            tim,
            Some(PwmPin::new_ch1(tilt, OutputType::PushPull)),
            None,
            Some(PwmPin::new_ch3(pan, OutputType::PushPull)),
            Some(PwmPin::new_ch4(trigger, OutputType::PushPull)),
            hz(50),
            CountingMode::EdgeAlignedUp,
        );

        // Pin the tick to 300 kHz so pulse widths are in the same units as the
        // limits in `config`, whatever prescaler SimplePwm picked for 50 Hz.
        let regs = pac::TIM3;
        regs.psc().write(|w| w.set_psc((TIM3_CLOCK_HZ / SERVO_TICK_HZ - 1) as u16));
        regs.arr().write(|w| w.set_arr(SERVO_FRAME_TICKS - 1));
        regs.egr().write(|w| w.set_ug(true));

        for ch in [Channel::Ch1, Channel::Ch3, Channel::Ch4] {
            pwm.enable(ch);
        }

        let mut timer = Self { _pwm: pwm };
        let mut channels = timer.channels();
        channels.pan.set_pulse(config.pan.center);
        channels.tilt.set_pulse(config.tilt.center);
        timer
    }

    /// Compare-register handles. Each write is a single register store, so
    /// handles on the same channel do not need a lock.
    pub fn channels(&mut self) -> ServoChannels {
        ServoChannels {
            pan: ServoChannel { index: 2 },
            tilt: ServoChannel { index: 0 },
            trigger: ServoChannel { index: 3 },
            pan_recenter: ServoChannel { index: 2 },
            tilt_recenter: ServoChannel { index: 0 },
        }
    }
}

pub struct ServoChannel {
    index: usize,
}

impl PulseOutput for ServoChannel {
    fn set_pulse(&mut self, ticks: u16) {
        pac::TIM3.ccr(self.index).write(|w| w.set_ccr(ticks));
    }
}
