//! Hall-effect home sensor
//!
//! Typical open-collector Hall switches (A3144, US5881) pull the line low
//! when the magnet is present, so they are wired with a pull-up and read
//! active-low.

use embedded_hal::digital::InputPin;

use miror_core::config::PinConfig;
use miror_core::traits::{HomeSensor, HwError};

/// Hall-effect home sensor on a GPIO input
pub struct HallSensor<I> {
    pin: I,
    /// If true, triggered = pin LOW
    active_low: bool,
}

impl<I: InputPin> HallSensor<I> {
    /// Create a new Hall sensor
    pub fn new(pin: I, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Create a sensor using the polarity from its pin configuration
    pub fn from_config(pin: I, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }
}

impl<I: InputPin> HomeSensor for HallSensor<I> {
    fn is_triggered(&mut self) -> Result<bool, HwError> {
        let high = self.pin.is_high().map_err(|_| HwError::SensorLine)?;
        Ok(high != self.active_low)
    }
}
