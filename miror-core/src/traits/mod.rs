//! Hardware abstraction traits
//!
//! These traits define the interface between the homing logic
//! and the GPIO-backed drivers.

pub mod sensor;
pub mod stepper;

pub use sensor::HomeSensor;
pub use stepper::{Direction, HwError, StepperDriver};
