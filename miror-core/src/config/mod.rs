//! Configuration types
//!
//! Board-agnostic configuration structures. The rig binary fills these
//! from the `machine.toml` compiled into it.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
