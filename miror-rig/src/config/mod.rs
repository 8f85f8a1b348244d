//! Configuration loading
//!
//! The rig configuration is the machine.toml embedded at build time.
//! It is parsed with serde, then checked for problems that build.rs
//! cannot see from the raw TOML.

use std::fmt;

use log::info;
use serde::Deserialize;

use miror_core::config::{self as core_config, RigConfig};

use crate::stream::StreamConfig;

/// Everything the rig needs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub rig: RigConfig,
    pub stream: StreamConfig,
}

/// Sections outside the core rig configuration
#[derive(Debug, Default, Deserialize)]
struct Extras {
    #[serde(default)]
    stream: StreamConfig,
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// TOML does not match the expected shape
    Parse(toml::de::Error),
    /// Parsed, but describes an unusable rig
    Invalid(core_config::ConfigError),
    /// Output lines are always active-high
    InvertedOutput { motor: String, pin: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "failed to parse machine.toml: {}", e),
            ConfigError::Invalid(e) => write!(f, "invalid machine.toml: {}", e),
            ConfigError::InvertedOutput { motor, pin } => {
                write!(f, "{}: output gpio{} cannot be inverted", motor, pin)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(e) => Some(e),
            ConfigError::InvertedOutput { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<core_config::ConfigError> for ConfigError {
    fn from(e: core_config::ConfigError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Parse and validate a machine.toml document
pub fn parse_config(content: &str) -> Result<MachineConfig, ConfigError> {
    let rig: RigConfig = toml::from_str(content)?;
    let extras: Extras = toml::from_str(content)?;

    rig.validate()?;

    for motor in &rig.motors {
        for pin in [motor.step_pin, motor.dir_pin] {
            if pin.inverted {
                return Err(ConfigError::InvertedOutput {
                    motor: motor.name.to_string(),
                    pin: pin.pin,
                });
            }
        }
    }

    Ok(MachineConfig {
        rig,
        stream: extras.stream,
    })
}

/// Log what this run is going to do
pub fn log_config_summary(config: &MachineConfig) {
    let timing = &config.rig.timing;
    info!(
        "Homing timing: step period {} us, debounce {} ms, settle {} ms",
        timing.step_period_us(),
        timing.debounce_ms,
        timing.settle_ms
    );

    for motor in &config.rig.motors {
        let limit = match motor.max_seek_steps {
            Some(steps) => steps.to_string(),
            None => "unlimited".to_string(),
        };
        info!(
            "{}: step={} dir={} sensor={} seek={} offset={} x {} (seek limit {})",
            motor.name,
            motor.step_pin,
            motor.dir_pin,
            motor.sensor_pin,
            motor.seek_direction,
            motor.offset_direction(),
            motor.home_steps,
            limit
        );
    }

    if config.stream.enabled {
        info!("Stream: {} on port {}", config.stream.device, config.stream.port);
    } else {
        info!("Stream: disabled");
    }
}
