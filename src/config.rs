//! Turret tuning and actuator limits.
//!
//! Pulse widths are timer ticks of the servo PWM timer (300 kHz tick,
//! 6000 ticks per 20 ms frame), so 450 ticks is a 1.5 ms pulse.

use crate::error::ConfigError;

// ── Reference hardware ────────────────────────────────────────────────────────

/// Pan servo travel (ticks)
pub const PAN_MIN: u16 = 150;
pub const PAN_MAX: u16 = 750;
/// Tilt servo travel (ticks). The bench turret's tilt linkage stops at 600,
/// narrow it there if the mechanism binds.
pub const TILT_MIN: u16 = 150;
pub const TILT_MAX: u16 = 750;
/// Neutral pulse for both axes
pub const AXIS_CENTER: u16 = 449;

/// Trigger servo resting pulse
pub const FIRE_REST: u16 = 450;
/// Trigger servo pulled pulse
pub const FIRE_ACTIVE: u16 = 750;

/// One PID step per host frame at ~30 fps
pub const NOMINAL_SAMPLE_PERIOD_S: f32 = 1.0 / 30.0;
/// Pinned steps tolerated before the loop is reset
pub const SATURATION_BUDGET: u32 = 30;

pub const DEFAULT_GAINS: PidGains = PidGains {
    kp: 0.1,
    ki: 0.01,
    kd: 0.05,
};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Travel limits of one servo axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLimits {
    pub min: u16,
    pub max: u16,
    pub center: u16,
}

impl AxisLimits {
    pub const fn new(min: u16, max: u16, center: u16) -> Self {
        Self { min, max, center }
    }

    /// Never traps, even on limits that `validated()` would reject.
    pub fn clamp(&self, pulse: i32) -> i32 {
        pulse.max(self.min as i32).min(self.max as i32)
    }

    /// True when `pulse` sits exactly on either travel limit.
    pub fn is_pinned(&self, pulse: i32) -> bool {
        pulse == self.min as i32 || pulse == self.max as i32
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedLimits);
        }
        if self.center < self.min || self.center > self.max {
            return Err(ConfigError::CenterOutOfRange);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Fixed positions of the trigger servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirePulses {
    pub rest: u16,
    pub active: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretConfig {
    pub pan: AxisLimits,
    pub tilt: AxisLimits,
    pub gains: PidGains,
    /// Seconds assumed between two MOVE activations
    pub sample_period_s: f32,
    pub saturation_budget: u32,
    pub fire: FirePulses,
}

impl TurretConfig {
    pub const DEFAULT: Self = Self {
        pan: AxisLimits::new(PAN_MIN, PAN_MAX, AXIS_CENTER),
        tilt: AxisLimits::new(TILT_MIN, TILT_MAX, AXIS_CENTER),
        gains: DEFAULT_GAINS,
        sample_period_s: NOMINAL_SAMPLE_PERIOD_S,
        saturation_budget: SATURATION_BUDGET,
        fire: FirePulses {
            rest: FIRE_REST,
            active: FIRE_ACTIVE,
        },
    };

    /// Checks limits, budget and sample period, returning the config unchanged
    /// when usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.pan.validate()?;
        self.tilt.validate()?;
        if self.saturation_budget == 0 {
            return Err(ConfigError::ZeroSaturationBudget);
        }
        if !(self.sample_period_s.is_finite() && self.sample_period_s > 0.0) {
            return Err(ConfigError::InvalidSamplePeriod);
        }
        Ok(self)
    }
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
