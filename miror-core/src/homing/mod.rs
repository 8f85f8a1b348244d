//! Per-motor homing
//!
//! A homing cycle spins the motor toward its Hall sensor, stops on the
//! trigger, waits for the magnet to settle and then moves a fixed number
//! of steps to the mechanical home position.

pub mod phase;
pub mod plan;

pub use phase::{HomingEvent, HomingFault, HomingPhase};
pub use plan::{HomingError, HomingPlan, HomingReport};
