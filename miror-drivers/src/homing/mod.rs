//! Homing cycle execution

pub mod axis;

pub use axis::{HomingAxis, HomingProgress};
