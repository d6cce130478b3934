#![cfg_attr(not(test), no_std)]

//! Control core of a pan/tilt turret with a firing actuator.
//!
//! Three tasks cooperate over a serial command link: the command task decodes
//! 3-byte packets, the control task runs one PID step per MOVE, and the fire
//! task drives the trigger servo. They share two mutex-guarded error fields and
//! three single-slot signals. Everything here builds on the host; the
//! `stm32` feature adds the board adapters used by the firmware binary.

#[macro_use]
pub mod logging;

pub mod config;
pub mod drivers;
pub mod error;
pub mod platform;
pub mod protocol;
pub mod signals;
pub mod state;
pub mod tasks;

#[cfg(feature = "stm32")]
pub mod board;
