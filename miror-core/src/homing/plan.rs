//! Homing plan, results and errors

use core::fmt;

use crate::config::{HomingTiming, MotorHwConfig};
use crate::traits::{Direction, HwError};

use super::phase::HomingFault;

/// Everything a driver needs to execute one motor's homing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingPlan {
    /// Direction while searching for the sensor
    pub seek_direction: Direction,
    /// Direction of the offset move
    pub offset_direction: Direction,
    /// Steps from trigger point to home
    pub offset_steps: u32,
    /// Seek step limit (None = unlimited)
    pub max_seek_steps: Option<u32>,
    /// Wait after trigger in milliseconds
    pub debounce_ms: u32,
    /// Pause before the offset move in milliseconds
    pub settle_ms: u32,
}

impl HomingPlan {
    /// Derive the plan for one motor
    pub fn from_config(motor: &MotorHwConfig, timing: &HomingTiming) -> Self {
        Self {
            seek_direction: motor.seek_direction,
            offset_direction: motor.offset_direction(),
            offset_steps: motor.home_steps,
            max_seek_steps: motor.max_seek_steps,
            debounce_ms: timing.debounce_ms,
            settle_ms: timing.settle_ms,
        }
    }

    /// Check whether the offset move turns the motor around
    pub fn reverses(&self) -> bool {
        self.seek_direction != self.offset_direction
    }

    /// Check whether another seek step is allowed after `taken` steps
    pub fn may_seek(&self, taken: u32) -> bool {
        self.max_seek_steps.map_or(true, |limit| taken < limit)
    }
}

/// Result of a completed homing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingReport {
    /// Steps taken before the sensor triggered
    pub seek_steps: u32,
    /// Steps taken during the offset move
    pub offset_steps: u32,
    /// Signed driver position at home
    pub position: i32,
}

/// Homing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// A cycle is already in progress
    Busy,
    /// Seek limit reached without the sensor triggering
    SensorNotTriggered {
        /// Seek steps taken
        steps: u32,
    },
    /// Interrupted before reaching home
    Aborted,
    /// GPIO line failure
    Hardware(HwError),
}

impl HomingError {
    /// Terminal fault recorded for this error
    pub fn fault(&self) -> HomingFault {
        match self {
            HomingError::SensorNotTriggered { .. } => HomingFault::SensorNotTriggered,
            HomingError::Aborted => HomingFault::Aborted,
            HomingError::Busy | HomingError::Hardware(_) => HomingFault::Hardware,
        }
    }
}

impl From<HwError> for HomingError {
    fn from(e: HwError) -> Self {
        HomingError::Hardware(e)
    }
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::Busy => f.write_str("homing already in progress"),
            HomingError::SensorNotTriggered { steps } => {
                write!(f, "home sensor did not trigger within {} steps", steps)
            }
            HomingError::Aborted => f.write_str("homing interrupted"),
            HomingError::Hardware(e) => write!(f, "hardware fault: {}", e),
        }
    }
}

impl core::error::Error for HomingError {}
