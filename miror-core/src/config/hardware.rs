//! Hardware configuration types
//!
//! These types define the pin assignments and per-motor homing parameters
//! for the rig.

use core::fmt;

use heapless::{FnvIndexSet, String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{
    ConfigError, HomingTiming, PinParseError, CONFIG_VERSION, GPIO_COUNT, MAX_LABEL_LEN,
    MAX_MOTORS,
};
use crate::traits::Direction;

/// Pin configuration with optional inversion
///
/// Written in configuration files as a pin string:
/// - `"gpio22"`: plain pin
/// - `"!gpio2"`: active-low (inverted)
/// - `"^gpio2"`: internal pull-up enabled
/// - `"^!gpio2"` or `"!^gpio2"`: both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// BCM GPIO number (0-27)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Parse a pin string
    pub fn parse(s: &str) -> Result<Self, PinParseError> {
        let mut rest = s.trim();
        let mut inverted = false;
        let mut pull_up = false;

        loop {
            if let Some(stripped) = rest.strip_prefix('!') {
                if inverted {
                    return Err(PinParseError::Malformed);
                }
                inverted = true;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix('^') {
                if pull_up {
                    return Err(PinParseError::Malformed);
                }
                pull_up = true;
                rest = stripped;
            } else {
                break;
            }
        }

        let num_str = rest.strip_prefix("gpio").ok_or(PinParseError::Malformed)?;
        if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinParseError::Malformed);
        }
        let pin: u8 = num_str.parse().map_err(|_| PinParseError::Malformed)?;
        if pin >= GPIO_COUNT {
            return Err(PinParseError::OutOfRange(pin));
        }

        Ok(Self {
            inverted,
            pull_up,
            ..Self::new(pin)
        })
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pull_up {
            f.write_str("^")?;
        }
        if self.inverted {
            f.write_str("!")?;
        }
        write!(f, "gpio{}", self.pin)
    }
}

#[cfg(feature = "serde")]
impl Serialize for PinConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PinConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PinVisitor;

        impl serde::de::Visitor<'_> for PinVisitor {
            type Value = PinConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a pin string such as \"gpio22\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PinConfig, E> {
                PinConfig::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PinVisitor)
    }
}

/// Per-motor hardware and homing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorHwConfig {
    /// Motor name used in logs (e.g., "motor1")
    pub name: String<MAX_LABEL_LEN>,
    /// Step pulse pin
    pub step_pin: PinConfig,
    /// Direction pin
    pub dir_pin: PinConfig,
    /// Hall-effect home sensor pin
    pub sensor_pin: PinConfig,
    /// Direction to spin while searching for the sensor
    pub seek_direction: Direction,
    /// Reverse direction before the offset move
    #[cfg_attr(feature = "serde", serde(default))]
    pub reverse_after_trigger: bool,
    /// Steps from the sensor trigger point to the home position
    pub home_steps: u32,
    /// Give up after this many seek steps (unlimited when absent)
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_seek_steps: Option<u32>,
}

impl MotorHwConfig {
    /// Direction used for the offset move after the sensor triggers
    pub fn offset_direction(&self) -> Direction {
        if self.reverse_after_trigger {
            self.seek_direction.opposite()
        } else {
            self.seek_direction
        }
    }

    /// All GPIO lines claimed by this motor
    pub fn pins(&self) -> [PinConfig; 3] {
        [self.step_pin, self.dir_pin, self.sensor_pin]
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Timing shared by all motors
    #[cfg_attr(feature = "serde", serde(rename = "homing", default))]
    pub timing: HomingTiming,
    /// Motors, homed in this order
    #[cfg_attr(feature = "serde", serde(rename = "motor"))]
    pub motors: Vec<MotorHwConfig, MAX_MOTORS>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            timing: HomingTiming::default(),
            motors: Vec::new(),
        }
    }
}

impl RigConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for problems that would only show up
    /// once the hardware is moving
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch(self.version));
        }
        if self.motors.is_empty() {
            return Err(ConfigError::NoMotors);
        }
        if self.timing.step_delay_us == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }

        for (i, motor) in self.motors.iter().enumerate() {
            if self.motors[..i].iter().any(|m| m.name == motor.name) {
                return Err(ConfigError::DuplicateName);
            }
        }

        let mut claimed: FnvIndexSet<u8, 32> = FnvIndexSet::new();
        for pin in self.motors.iter().flat_map(|m| m.pins()) {
            match claimed.insert(pin.pin) {
                Ok(true) => {}
                _ => return Err(ConfigError::PinConflict(pin.pin)),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    fn motor(name: &str, step: u8, dir: u8, sensor: u8) -> MotorHwConfig {
        let mut label = String::new();
        label.push_str(name).unwrap();
        MotorHwConfig {
            name: label,
            step_pin: PinConfig::new(step),
            dir_pin: PinConfig::new(dir),
            sensor_pin: PinConfig {
                pin: sensor,
                inverted: true,
                pull_up: true,
            },
            seek_direction: Direction::Clockwise,
            reverse_after_trigger: false,
            home_steps: 100,
            max_seek_steps: None,
        }
    }

    fn rig(motors: &[MotorHwConfig]) -> RigConfig {
        let mut config = RigConfig::new();
        for m in motors {
            config.motors.push(m.clone()).unwrap();
        }
        config
    }

    #[test]
    fn test_pin_config() {
        let pin = PinConfig::new(10);
        assert_eq!(pin.pin, 10);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(PinConfig::parse("gpio22"), Ok(PinConfig::new(22)));
        assert_eq!(
            PinConfig::parse("!gpio2"),
            Ok(PinConfig {
                inverted: true,
                ..PinConfig::new(2)
            })
        );
        assert_eq!(
            PinConfig::parse("^gpio4"),
            Ok(PinConfig {
                pull_up: true,
                ..PinConfig::new(4)
            })
        );
        assert_eq!(PinConfig::parse(" gpio0 "), Ok(PinConfig::new(0)));

        let both = PinConfig {
            pin: 3,
            inverted: true,
            pull_up: true,
        };
        assert_eq!(PinConfig::parse("^!gpio3"), Ok(both));
        assert_eq!(PinConfig::parse("!^gpio3"), Ok(both));
    }

    #[test]
    fn test_parse_pin_string_rejects_garbage() {
        assert_eq!(PinConfig::parse("gpio28"), Err(PinParseError::OutOfRange(28)));
        assert_eq!(PinConfig::parse("pin11"), Err(PinParseError::Malformed));
        assert_eq!(PinConfig::parse(""), Err(PinParseError::Malformed));
        assert_eq!(PinConfig::parse("gpio"), Err(PinParseError::Malformed));
        assert_eq!(PinConfig::parse("gpio+1"), Err(PinParseError::Malformed));
        assert_eq!(PinConfig::parse("!!gpio1"), Err(PinParseError::Malformed));
        assert_eq!(PinConfig::parse("gpio999"), Err(PinParseError::Malformed));
    }

    #[test]
    fn test_pin_display_round_trips() {
        for s in ["gpio22", "!gpio2", "^gpio4", "^!gpio3"] {
            assert_eq!(PinConfig::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_offset_direction() {
        let mut m = motor("m", 1, 2, 3);
        assert_eq!(m.offset_direction(), Direction::Clockwise);

        m.reverse_after_trigger = true;
        assert_eq!(m.offset_direction(), Direction::CounterClockwise);
    }

    #[test]
    fn test_empty_config() {
        let config = RigConfig::new();
        assert!(config.motors.is_empty());
        assert_eq!(config.validate(), Err(ConfigError::NoMotors));
    }

    #[test]
    fn test_valid_two_motor_config() {
        let config = rig(&[motor("motor1", 22, 27, 2), motor("motor2", 23, 24, 3)]);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.motors[1].step_pin.pin, 23);
    }

    #[test]
    fn test_pin_conflict_across_motors() {
        let config = rig(&[motor("motor1", 22, 27, 2), motor("motor2", 23, 22, 3)]);
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(22)));
    }

    #[test]
    fn test_pin_conflict_within_motor() {
        let config = rig(&[motor("motor1", 5, 5, 2)]);
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(5)));
    }

    #[test]
    fn test_duplicate_names() {
        let config = rig(&[motor("motor1", 22, 27, 2), motor("motor1", 23, 24, 3)]);
        assert_eq!(config.validate(), Err(ConfigError::DuplicateName));
    }

    #[test]
    fn test_zero_step_delay() {
        let mut config = rig(&[motor("motor1", 22, 27, 2)]);
        config.timing.step_delay_us = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepDelay));
    }

    #[test]
    fn test_version_mismatch() {
        let mut config = rig(&[motor("motor1", 22, 27, 2)]);
        config.version = 2;
        assert_eq!(config.validate(), Err(ConfigError::VersionMismatch(2)));
    }
}
