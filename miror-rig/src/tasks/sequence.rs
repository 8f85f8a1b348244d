//! Homing sequence
//!
//! Homes every motor in configuration order, then starts the camera
//! stream. The run is tracked by [`RigState`]; the first failure or an
//! interrupt ends it with the remaining motors untouched.

use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use miror_core::homing::{HomingError, HomingPhase, HomingPlan};
use miror_core::state::{ErrorKind, RigEvent, RigState};
use miror_core::traits::{HomeSensor, StepperDriver};
use miror_drivers::homing::HomingAxis;

use crate::stream::StreamConfig;

/// A named motor ready to be homed
pub struct RigMotor<S, H, D> {
    pub name: String,
    pub axis: HomingAxis<S, H, D>,
}

/// Run the whole sequence
///
/// `interrupted` is polled between homing steps. `launch` starts the
/// stream and is only called once every motor is home.
pub fn run_sequence<S, H, D, L>(
    motors: &mut [RigMotor<S, H, D>],
    stream: &StreamConfig,
    interrupted: &AtomicBool,
    launch: L,
) -> RigState
where
    S: StepperDriver,
    H: HomeSensor,
    D: DelayNs,
    L: FnOnce(&StreamConfig) -> std::io::Result<u32>,
{
    let count = u8::try_from(motors.len()).unwrap_or(u8::MAX);
    let mut state = RigState::Boot.transition(RigEvent::BootComplete { motors: count });
    if state.is_terminal() {
        error!("No motors to home");
        return state;
    }

    while let Some(index) = state.current_motor() {
        let Some(motor) = motors.get_mut(usize::from(index)) else {
            return state.transition(RigEvent::ErrorDetected(ErrorKind::ConfigError));
        };
        info!("Starting {}...", motor.name);

        let plan = *motor.axis.plan();
        let name = motor.name.as_str();
        let result = motor.axis.home(
            || interrupted.load(Ordering::SeqCst),
            |phase| log_phase(name, &plan, phase),
        );

        let event = match result {
            Ok(report) => {
                debug!(
                    "{}: {} seek steps, {} offset steps, position {}",
                    name, report.seek_steps, report.offset_steps, report.position
                );
                RigEvent::MotorHomed
            }
            Err(e) => {
                if e != HomingError::Aborted {
                    error!("{}: {}", name, e);
                }
                RigEvent::from_homing_error(&e)
            }
        };

        state = state.transition(event);
        if state.is_terminal() {
            return state;
        }
    }

    if interrupted.load(Ordering::SeqCst) {
        return state.transition(RigEvent::Interrupt);
    }

    if !stream.enabled {
        info!("Live stream disabled, skipping");
        return state.transition(RigEvent::StreamSkipped);
    }

    info!("Live stream starting...");
    info!("URL: {}", stream.url());
    info!("Starting live camera stream...");

    let event = match launch(stream) {
        Ok(pid) => {
            debug!("{} running as pid {}", stream.command, pid);
            RigEvent::StreamLaunched
        }
        Err(e) => {
            error!("Failed to start {}: {}", stream.command, e);
            RigEvent::ErrorDetected(ErrorKind::StreamLaunchFailed)
        }
    };

    state.transition(event)
}

fn log_phase(name: &str, plan: &HomingPlan, phase: HomingPhase) {
    match phase {
        HomingPhase::Seeking => info!("{}: Spinning motor {}...", name, plan.seek_direction),
        HomingPhase::Debouncing => info!("{}: Hall sensor triggered, stopping motor.", name),
        HomingPhase::Settling => {
            debug!("{}: Waiting {} ms before moving home", name, plan.settle_ms)
        }
        HomingPhase::Offsetting => info!(
            "{}: Moving motor to home position for {} steps...",
            name, plan.offset_steps
        ),
        HomingPhase::Homed => info!("{}: Motor has reached the home position.", name),
        HomingPhase::Failed(fault) => warn!("{}: Homing stopped ({:?})", name, fault),
        HomingPhase::Idle => {}
    }
}
