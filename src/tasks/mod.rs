//! Asynchronous tasks for robot operation.
//!
//! This module contains the Embassy async tasks of the locomotion core:
//! - [`locomotion_task`]: Ticks the engine at the servo cadence and
//!   emits pulse frames for the external bus driver.
//! - [`telemetry_task`]: Publishes the robot state snapshot for the
//!   external reporter.
//!
//! Tasks are spawned from the firmware binary and communicate via
//! Embassy channels; the input decoder feeds the command channel at its
//! own cadence.
pub mod locomotion_task;
pub mod telemetry_task;
