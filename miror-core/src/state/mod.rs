//! Rig run state machine
//!
//! Defines the authoritative order of a run: every motor is homed,
//! one after the other, before the camera stream starts.

pub mod events;
pub mod machine;

pub use events::RigEvent;
pub use machine::{ErrorKind, RigState};
