//! GPIO acquisition
//!
//! Claims the Raspberry Pi lines for each motor through rppal. Lines are
//! handed back to the kernel, in their original mode, when dropped.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::hal::Delay;

use miror_core::config::{HomingTiming, MotorHwConfig, PinConfig};
use miror_core::homing::HomingPlan;
use miror_drivers::homing::HomingAxis;
use miror_drivers::sensor::HallSensor;
use miror_drivers::stepper::StepDirStepper;

use crate::tasks::RigMotor;

type PiStepper = StepDirStepper<OutputPin, OutputPin, Delay>;

/// Motor wired to Raspberry Pi GPIO
pub type PiMotor = RigMotor<PiStepper, HallSensor<InputPin>, Delay>;

/// Claim an output line, driven low
fn output(gpio: &Gpio, pin: &PinConfig) -> Result<OutputPin> {
    let line = gpio
        .get(pin.pin)
        .with_context(|| format!("gpio{} is unavailable", pin.pin))?;
    Ok(line.into_output_low())
}

/// Claim an input line with the configured bias
fn input(gpio: &Gpio, pin: &PinConfig) -> Result<InputPin> {
    let line = gpio
        .get(pin.pin)
        .with_context(|| format!("gpio{} is unavailable", pin.pin))?;
    Ok(if pin.pull_up {
        line.into_input_pullup()
    } else {
        line.into_input()
    })
}

/// Claim every line of one motor and build its homing axis
pub fn acquire_motor(gpio: &Gpio, motor: &MotorHwConfig, timing: &HomingTiming) -> Result<PiMotor> {
    let name = motor.name.as_str();

    let step = output(gpio, &motor.step_pin).with_context(|| format!("{}: step line", name))?;
    let dir = output(gpio, &motor.dir_pin).with_context(|| format!("{}: direction line", name))?;
    let sensor = input(gpio, &motor.sensor_pin).with_context(|| format!("{}: sensor line", name))?;

    let stepper = StepDirStepper::new(step, dir, Delay::new(), timing.step_delay_us)
        .with_context(|| format!("{}: failed to initialise stepper lines", name))?;
    let sensor = HallSensor::from_config(sensor, &motor.sensor_pin);
    let plan = HomingPlan::from_config(motor, timing);

    debug!(
        "{}: acquired step={} dir={} sensor={}",
        name,
        motor.step_pin,
        motor.dir_pin,
        motor.sensor_pin
    );

    Ok(RigMotor {
        name: name.to_string(),
        axis: HomingAxis::new(stepper, sensor, Delay::new(), plan),
    })
}

/// Drive every pulse line low and give the lines back
pub fn release(motors: Vec<PiMotor>) {
    for motor in motors {
        let (stepper, _sensor, _delay) = motor.axis.into_parts();
        if let Err(e) = stepper.release() {
            warn!("{}: could not drive pulse line low: {}", motor.name, e);
        }
    }
    info!("GPIO released");
}
