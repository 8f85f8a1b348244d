//! MIROR - mirror rig homing
//!
//! Homes the mirror motors against their Hall sensors, moves each one to
//! its mechanical home offset and then starts the live camera stream.
//! Runs once and exits; the stream keeps running in the background.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use rppal::gpio::Gpio;

use miror_core::state::RigState;

use crate::config::{log_config_summary, parse_config};

mod config;
mod pins;
mod stream;
mod tasks;

/// Embedded rig configuration
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../machine.toml");

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(RigState::Complete) => ExitCode::SUCCESS,
        // Operator stop is a clean exit
        Ok(RigState::Interrupted) => ExitCode::SUCCESS,
        Ok(state) => {
            error!("Run ended in {:?}", state);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, `info` unless RUST_LOG says otherwise
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn run() -> Result<RigState> {
    info!("MIROR rig starting...");

    let config = parse_config(EMBEDDED_CONFIG).context("embedded configuration rejected")?;
    log_config_summary(&config);

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to install SIGINT handler")?;

    let gpio = Gpio::new().context("failed to open GPIO")?;

    let mut motors = Vec::with_capacity(config.rig.motors.len());
    for motor in &config.rig.motors {
        // Lines already claimed are released when `motors` drops
        motors.push(pins::acquire_motor(&gpio, motor, &config.rig.timing)?);
    }
    info!("GPIO initialized for {} motors", motors.len());

    let state = tasks::run_sequence(&mut motors, &config.stream, &interrupted, |stream| {
        stream.launch()
    });

    if state == RigState::Interrupted {
        warn!("Execution interrupted, cleaning up GPIO...");
    }
    pins::release(motors);

    Ok(state)
}
