//! Library root for the hexapod locomotion core.
//!
//! Re-exports all main modules: [`robot`], [`kinematics`], [`gait`],
//! [`engine`] and [`tasks`]. Used by the firmware binary and for
//! integration in tests or other binaries.
#![no_std]

pub mod engine;
pub mod gait;
pub mod kinematics;
pub mod robot;
pub mod tasks;

pub const COMMAND_CHANNEL_SIZE: usize = 4;
pub const FRAME_CHANNEL_SIZE: usize = 4;
pub const TELEMETRY_CHANNEL_SIZE: usize = 2;
