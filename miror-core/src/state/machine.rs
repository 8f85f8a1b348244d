//! Rig state definition
//!
//! Every step of a run is a function of the current state and an event.

use super::events::RigEvent;

/// Rig states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RigState {
    /// Config loading and GPIO acquisition
    Boot,
    /// Homing motor `motor` (zero-based) of `of`
    Homing { motor: u8, of: u8 },
    /// All motors homed, launching the camera stream
    StartingStream,
    /// Run finished successfully
    Complete,
    /// Operator interrupted the run
    Interrupted,
    /// Fault detected; pulse lines low
    Error(ErrorKind),
}

/// Types of errors that can end a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Home sensor never triggered within the seek limit
    SensorNotTriggered,
    /// GPIO line failure
    HardwareFault,
    /// Streaming process could not be started
    StreamLaunchFailed,
    /// Configuration error
    ConfigError,
}

impl RigState {
    /// Motor currently being homed
    pub fn current_motor(&self) -> Option<u8> {
        match self {
            RigState::Homing { motor, .. } => Some(*motor),
            _ => None,
        }
    }

    /// Check if the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RigState::Complete | RigState::Interrupted | RigState::Error(_)
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: RigEvent) -> Self {
        use RigEvent::*;
        use RigState::*;

        match (self, event) {
            // Boot transitions
            (Boot, BootComplete { motors: 0 }) => Error(ErrorKind::ConfigError),
            (Boot, BootComplete { motors }) => Homing {
                motor: 0,
                of: motors,
            },

            // Homing transitions: strictly one motor after the other
            (Homing { motor, of }, MotorHomed) if motor + 1 < of => Homing {
                motor: motor + 1,
                of,
            },
            (Homing { .. }, MotorHomed) => StartingStream,

            // Stream transitions
            (StartingStream, StreamLaunched) => Complete,
            (StartingStream, StreamSkipped) => Complete,

            // Interrupt and errors from any running state
            (state, Interrupt) if !state.is_terminal() => Interrupted,
            (state, ErrorDetected(kind)) if !state.is_terminal() => Error(kind),

            // Default: stay in current state
            _ => self,
        }
    }
}
