//! Home reference sensor trait

use super::stepper::HwError;

/// Trait for home reference sensors (Hall-effect switch, endstop)
///
/// Implementations hide the electrical polarity: `is_triggered` is true
/// when the magnet is at the reference position, regardless of whether
/// the line is active-high or active-low.
pub trait HomeSensor {
    /// Check whether the sensor currently reports the reference position
    fn is_triggered(&mut self) -> Result<bool, HwError>;
}
