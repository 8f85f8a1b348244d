//! Board-agnostic core logic for the MIROR rig
//!
//! This crate contains everything about homing that does not depend on
//! a specific GPIO implementation:
//!
//! - Hardware abstraction traits (stepper, home sensor)
//! - Per-motor homing phases and the plan derived from configuration
//! - Run state machine for the whole rig
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod homing;
pub mod state;
pub mod traits;
