//! Kinematics algorithms and servo conversion for the hexapod.
//!
//! This module provides the mathematical routines for converting between
//! Cartesian foot targets and joint angles, and for mapping joint angles
//! to calibrated servo pulse widths.
//!
//! - [`vector`] is the small 3D vector type used for foot targets.
//! - [`conversion`] handles unit conversion and servo pulse mapping.
//! - [`ik`] solves per-leg inverse kinematics.
//!
//! Used by the locomotion engine to plan and execute leg movements.
pub mod conversion;
pub mod ik;
pub mod vector;
