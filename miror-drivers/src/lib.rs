//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in miror-core on top of `embedded-hal` 1.0 pins and delays:
//!
//! - Pulse/direction stepper driver
//! - Hall-effect home sensor
//! - Homing axis executing one motor's homing cycle

#![no_std]
#![deny(unsafe_code)]

pub mod homing;
pub mod sensor;
pub mod stepper;

#[cfg(test)]
mod mock;
