//! Gait selection and per-leg phase sequencing.
//!
//! - [`pattern`] holds each gait's start states and step ordering as data.
//! - [`machine`] advances every leg's phase once per control tick.
pub mod machine;
pub mod pattern;
