//! Configuration type definitions
//!
//! Limits, shared timing and the error types reported while loading
//! a rig configuration.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum motors per rig
pub const MAX_MOTORS: usize = 2;

/// Number of user GPIO lines on the Raspberry Pi header (BCM 0-27)
pub const GPIO_COUNT: u8 = 28;

/// Supported configuration version
pub const CONFIG_VERSION: u8 = 1;

/// Timing shared by every motor's homing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HomingTiming {
    /// Half period of the step square wave in microseconds
    pub step_delay_us: u32,
    /// Wait after the sensor triggers, before anything else moves
    pub debounce_ms: u32,
    /// Additional pause before the offset move starts
    pub settle_ms: u32,
}

impl Default for HomingTiming {
    fn default() -> Self {
        Self {
            step_delay_us: 1000,
            debounce_ms: 100,
            settle_ms: 1000,
        }
    }
}

impl HomingTiming {
    /// Full step period (high + low) in microseconds
    pub fn step_period_us(&self) -> u64 {
        self.step_delay_us as u64 * 2
    }
}

/// Pin string could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinParseError {
    /// String does not have the `gpioN` shape
    Malformed,
    /// Pin number outside the header range
    OutOfRange(u8),
}

impl fmt::Display for PinParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinParseError::Malformed => {
                write!(f, "expected a pin like \"gpio22\", \"!gpio2\" or \"^!gpio2\"")
            }
            PinParseError::OutOfRange(pin) => {
                write!(f, "gpio{} is outside the range gpio0-gpio{}", pin, GPIO_COUNT - 1)
            }
        }
    }
}

impl core::error::Error for PinParseError {}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No motors configured
    NoMotors,
    /// Two motors share a name
    DuplicateName,
    /// A GPIO line is assigned more than once
    PinConflict(u8),
    /// Step delay of zero would never produce a pulse
    ZeroStepDelay,
    /// Unsupported configuration version
    VersionMismatch(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoMotors => write!(f, "at least one [[motor]] is required"),
            ConfigError::DuplicateName => write!(f, "motor names must be unique"),
            ConfigError::PinConflict(pin) => write!(f, "gpio{} is assigned more than once", pin),
            ConfigError::ZeroStepDelay => write!(f, "step_delay_us must be greater than zero"),
            ConfigError::VersionMismatch(v) => write!(
                f,
                "config version {} is not supported (expected {})",
                v, CONFIG_VERSION
            ),
        }
    }
}

impl core::error::Error for ConfigError {}
