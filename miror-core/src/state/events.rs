//! Events that trigger rig state transitions

use super::machine::ErrorKind;
use crate::homing::HomingError;

/// Events that can trigger rig state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RigEvent {
    // Lifecycle events
    /// Configuration loaded and GPIO lines acquired
    BootComplete {
        /// Number of motors to home
        motors: u8,
    },

    // Homing events
    /// Current motor reached its home position
    MotorHomed,

    // Stream events
    /// Streaming process started
    StreamLaunched,
    /// Streaming disabled in configuration
    StreamSkipped,

    // Safety events
    /// Operator interrupt (SIGINT)
    Interrupt,
    /// Error detected
    ErrorDetected(ErrorKind),
}

impl RigEvent {
    /// Map a homing failure onto the event it raises
    pub fn from_homing_error(e: &HomingError) -> Self {
        match e {
            HomingError::Aborted => RigEvent::Interrupt,
            HomingError::SensorNotTriggered { .. } => {
                RigEvent::ErrorDetected(ErrorKind::SensorNotTriggered)
            }
            HomingError::Busy | HomingError::Hardware(_) => {
                RigEvent::ErrorDetected(ErrorKind::HardwareFault)
            }
        }
    }
}
