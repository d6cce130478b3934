use crate::config::{AxisLimits, PidGains, TurretConfig};
use crate::state::AimSnapshot;

/// Incremental PID on one servo axis.
///
/// The output is a pulse *increment*: each step adds
/// `kp·e + ki·Σe + kd·Δe/dt` to the stored pulse, truncates to whole ticks and
/// clamps to the axis travel. The integral is unbounded; saturation is
/// handled one level up by [`PanTiltPid`].
pub struct AxisPid {
    gains: PidGains,
    limits: AxisLimits,
    pulse: i32,
    integral: f32,
    prev_error: f32,
}

impl AxisPid {
    pub fn new(gains: PidGains, limits: AxisLimits) -> Self {
        Self {
            gains,
            limits,
            pulse: limits.center as i32,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.pulse = self.limits.center as i32;
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Returns the new clamped pulse.
    pub fn update(&mut self, error: f32, dt: f32) -> i32 {
        self.integral += error;
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;

        let delta = self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative;
        self.pulse = self.limits.clamp((self.pulse as f32 + delta) as i32);
        self.pulse
    }

    pub fn pulse(&self) -> i32 {
        self.pulse
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn prev_error(&self) -> f32 {
        self.prev_error
    }

    pub fn is_pinned(&self) -> bool {
        self.limits.is_pinned(self.pulse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "stm32", derive(defmt::Format))]
pub enum StepOutcome {
    /// Write these pulses to the axis servos
    Drive { pan: u16, tilt: u16 },
    /// Saturation budget exhausted; state has been reset to center
    Fault,
}

/// Pan/tilt PID pair with saturation-fault detection.
///
/// Every step that leaves either axis exactly on a travel limit spends one
/// unit of the saturation budget. The budget is only refilled by a fault, so
/// pinned steps count whether or not they are consecutive.
pub struct PanTiltPid {
    pan: AxisPid,
    tilt: AxisPid,
    dt: f32,
    budget: u32,
    remaining: u32,
}

impl PanTiltPid {
    pub fn new(config: &TurretConfig) -> Self {
        Self {
            pan: AxisPid::new(config.gains, config.pan),
            tilt: AxisPid::new(config.gains, config.tilt),
            dt: config.sample_period_s,
            budget: config.saturation_budget,
            remaining: config.saturation_budget,
        }
    }

    pub fn reset(&mut self) {
        self.pan.reset();
        self.tilt.reset();
        self.remaining = self.budget;
    }

    pub fn step(&mut self, aim: AimSnapshot) -> StepOutcome {
        let pan = self.pan.update(aim.pan_error as f32, self.dt);
        let tilt = self.tilt.update(aim.tilt_error as f32, self.dt);

        if self.pan.is_pinned() || self.tilt.is_pinned() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        if self.remaining == 0 {
            self.reset();
            return StepOutcome::Fault;
        }

        StepOutcome::Drive {
            pan: pan as u16,
            tilt: tilt as u16,
        }
    }

    /// Current (pan, tilt) pulses
    pub fn pulses(&self) -> (u16, u16) {
        (self.pan.pulse() as u16, self.tilt.pulse() as u16)
    }

    pub fn remaining_budget(&self) -> u32 {
        self.remaining
    }

    pub fn pan(&self) -> &AxisPid {
        &self.pan
    }

    pub fn tilt(&self) -> &AxisPid {
        &self.tilt
    }
}
