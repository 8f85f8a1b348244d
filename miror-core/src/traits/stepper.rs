//! Stepper motor driver trait
//!
//! This trait abstracts over pulse/direction stepper drivers
//! (DM542, TB6600, A4988 and similar).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
///
/// On a pulse/direction driver the direction line is held high for
/// clockwise rotation and low for counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "cw"))]
    Clockwise,
    /// Counter-clockwise rotation
    #[cfg_attr(feature = "serde", serde(rename = "ccw"))]
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Level of the direction line for this direction
    pub fn is_high(self) -> bool {
        self == Direction::Clockwise
    }

    /// Position change for one step in this direction
    pub fn step_delta(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => f.write_str("CW"),
            Direction::CounterClockwise => f.write_str("CCW"),
        }
    }
}

/// GPIO line failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwError {
    /// Could not drive the step pulse line
    StepLine,
    /// Could not drive the direction line
    DirectionLine,
    /// Could not read the home sensor
    SensorLine,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwError::StepLine => f.write_str("failed to drive step line"),
            HwError::DirectionLine => f.write_str("failed to drive direction line"),
            HwError::SensorLine => f.write_str("failed to read home sensor"),
        }
    }
}

impl core::error::Error for HwError {}

/// Trait for pulse/direction stepper motor drivers
///
/// Implementations own the step and direction lines and the timing
/// source used to shape each pulse.
pub trait StepperDriver {
    /// Set the rotation direction
    ///
    /// Direction should only be changed while the pulse line is low.
    fn set_direction(&mut self, dir: Direction) -> Result<(), HwError>;

    /// Get the current direction
    fn direction(&self) -> Direction;

    /// Emit one step: one full square-wave period on the pulse line
    fn step(&mut self) -> Result<(), HwError>;

    /// Drive the pulse line low
    fn stop(&mut self) -> Result<(), HwError>;

    /// Signed step count since the driver was created, wrapping on overflow
    fn position(&self) -> i32;
}
