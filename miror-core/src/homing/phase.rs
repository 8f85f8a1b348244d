//! Homing phase state machine
//!
//! Each motor's homing cycle is a function of its current phase
//! and an event reported by the driver executing it.

/// Why a homing cycle stopped before reaching home
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingFault {
    /// Seek step limit reached without a sensor trigger
    SensorNotTriggered,
    /// Cycle interrupted by the operator
    Aborted,
    /// GPIO line failure
    Hardware,
}

/// Homing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Not started
    #[default]
    Idle,
    /// Stepping toward the sensor, polling it before every step
    Seeking,
    /// Sensor triggered, motor stopped, waiting out contact bounce
    Debouncing,
    /// Pause before the offset move
    Settling,
    /// Stepping the fixed offset to the home position
    Offsetting,
    /// Motor is at its home position
    Homed,
    /// Cycle stopped early; pulse line is low
    Failed(HomingFault),
}

/// Events reported while executing a homing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingEvent {
    /// Begin (or restart) the cycle
    Start,
    /// Sensor reported the reference position
    SensorTriggered,
    /// Seek step limit exhausted
    SeekLimitReached,
    /// Debounce interval elapsed
    DebounceElapsed,
    /// Settle interval elapsed and offset direction asserted
    SettleElapsed,
    /// All offset steps taken
    OffsetComplete,
    /// Operator interrupt
    Abort,
    /// A GPIO operation failed
    HardwareFault,
}

impl HomingPhase {
    /// Check if the cycle is in progress
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            HomingPhase::Seeking
                | HomingPhase::Debouncing
                | HomingPhase::Settling
                | HomingPhase::Offsetting
        )
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: HomingEvent) -> Self {
        use HomingEvent::*;
        use HomingPhase::*;

        match (self, event) {
            (Idle | Homed | Failed(_), Start) => Seeking,

            (Seeking, SensorTriggered) => Debouncing,
            (Seeking, SeekLimitReached) => Failed(HomingFault::SensorNotTriggered),

            (Debouncing, DebounceElapsed) => Settling,

            (Settling, SettleElapsed) => Offsetting,

            (Offsetting, OffsetComplete) => Homed,

            (phase, Abort) if phase.is_active() => Failed(HomingFault::Aborted),
            (phase, HardwareFault) if phase.is_active() => Failed(HomingFault::Hardware),

            // Default: stay in current phase
            _ => self,
        }
    }
}
