//! Rig tasks
//!
//! The rig runs a single blocking task: home every motor, then start the
//! stream.

pub mod sequence;

pub use sequence::{run_sequence, RigMotor};
