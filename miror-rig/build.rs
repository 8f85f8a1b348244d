//! Build script for miror-rig
//!
//! Validates machine.toml at compile time so a broken configuration never
//! reaches the rig.

use std::fs;
use std::path::Path;

/// Highest BCM line on the Raspberry Pi header
const MAX_GPIO: u64 = 27;

/// Maximum motors per rig
const MAX_MOTORS: usize = 2;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate machine.toml configuration at compile time
fn validate_config() {
    // Re-run if machine.toml changes
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The rig requires a machine.toml configuration file.             ║\n\
            ║  Please create one in the miror-rig directory.                   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in machine.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    validate_homing(&config);
    validate_motors(&config);
    validate_stream(&config);

    println!("cargo:warning=machine.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list of problems, if there are any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Check the `[^][!]gpioN` pin string shape
///
/// Returns the pin number and whether it is inverted.
fn parse_pin(s: &str) -> Option<(u64, bool)> {
    let mut rest = s;
    let mut inverted = false;
    let mut pull_up = false;

    loop {
        if let Some(r) = rest.strip_prefix('!') {
            if inverted {
                return None;
            }
            inverted = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('^') {
            if pull_up {
                return None;
            }
            pull_up = true;
            rest = r;
        } else {
            break;
        }
    }

    let digits = rest.strip_prefix("gpio")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let pin: u64 = digits.parse().ok()?;
    (pin <= MAX_GPIO).then_some((pin, inverted))
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    match config.get("version") {
        Some(toml::Value::Integer(1)) => {}
        Some(_) => errors.push("'version' must be 1".to_string()),
        None => errors.push("Missing 'version' - set version = 1".to_string()),
    }

    if config.get("motor").is_none() {
        errors.push("Missing [[motor]] section - at least one motor is required".to_string());
    }

    report("Missing required sections in machine.toml", &errors);
}

/// Validate the shared [homing] timing
fn validate_homing(config: &toml::Value) {
    let homing = match config.get("homing") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            report("Invalid homing configuration", &["[homing] must be a table".to_string()]);
            return;
        }
        // Defaults apply
        None => return,
    };

    let mut errors = Vec::new();

    for key in ["step_delay_us", "debounce_ms", "settle_ms"] {
        match homing.get(key) {
            Some(toml::Value::Integer(v)) if *v < 0 || *v > u32::MAX as i64 => {
                errors.push(format!("[homing] {} is out of range", key));
            }
            Some(toml::Value::Integer(_)) | None => {}
            Some(_) => errors.push(format!("[homing] {} must be an integer", key)),
        }
    }

    if let Some(toml::Value::Integer(0)) = homing.get("step_delay_us") {
        errors.push("[homing] step_delay_us must be greater than zero".to_string());
    }

    report("Invalid homing configuration", &errors);
}

/// Validate [[motor]] entries
fn validate_motors(config: &toml::Value) {
    let motors = match config.get("motor") {
        Some(toml::Value::Array(a)) => a,
        Some(_) => {
            report(
                "Invalid motor configuration",
                &["motors must be declared as [[motor]]".to_string()],
            );
            return;
        }
        None => return,
    };

    let mut errors = Vec::new();

    if motors.is_empty() {
        errors.push("at least one [[motor]] is required".to_string());
    }
    if motors.len() > MAX_MOTORS {
        errors.push(format!("at most {} motors are supported", MAX_MOTORS));
    }

    let mut names: Vec<String> = Vec::new();
    let mut pins: Vec<u64> = Vec::new();

    for (i, motor) in motors.iter().enumerate() {
        let motor = match motor.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("motor {} must be a table", i));
                continue;
            }
        };

        // Required fields
        let name = match motor.get("name") {
            Some(toml::Value::String(name)) => name.clone(),
            Some(_) => {
                errors.push(format!("motor {} 'name' must be a string", i));
                format!("motor {}", i)
            }
            None => {
                errors.push(format!("motor {} missing 'name'", i));
                format!("motor {}", i)
            }
        };

        if name.len() > 16 {
            errors.push(format!("[motor.{}] name must be 16 characters or less", name));
        }
        if names.contains(&name) {
            errors.push(format!("duplicate motor name '{}'", name));
        }
        names.push(name.clone());

        for key in ["step_pin", "dir_pin", "sensor_pin"] {
            match motor.get(key) {
                Some(toml::Value::String(s)) => match parse_pin(s) {
                    Some((_, true)) if key != "sensor_pin" => {
                        errors.push(format!("[motor.{}] {} cannot be inverted", name, key));
                    }
                    Some((pin, _)) => {
                        if pins.contains(&pin) {
                            errors.push(format!("[motor.{}] gpio{} is already in use", name, pin));
                        }
                        pins.push(pin);
                    }
                    None => {
                        errors.push(format!("[motor.{}] {} '{}' is not a valid pin", name, key, s));
                    }
                },
                Some(_) => errors.push(format!("[motor.{}] {} must be a string", name, key)),
                None => errors.push(format!("[motor.{}] missing '{}'", name, key)),
            }
        }

        match motor.get("seek_direction") {
            Some(toml::Value::String(dir)) => {
                if !["cw", "ccw"].contains(&dir.as_str()) {
                    errors.push(format!("[motor.{}] seek_direction must be 'cw' or 'ccw'", name));
                }
            }
            _ => errors.push(format!("[motor.{}] missing 'seek_direction'", name)),
        }

        match motor.get("reverse_after_trigger") {
            Some(toml::Value::Boolean(_)) | None => {}
            Some(_) => errors.push(format!(
                "[motor.{}] reverse_after_trigger must be true or false",
                name
            )),
        }

        match motor.get("home_steps") {
            Some(toml::Value::Integer(steps)) => {
                if *steps < 0 || *steps > u32::MAX as i64 {
                    errors.push(format!("[motor.{}] home_steps is out of range", name));
                }
            }
            _ => errors.push(format!("[motor.{}] missing 'home_steps'", name)),
        }

        match motor.get("max_seek_steps") {
            Some(toml::Value::Integer(steps)) => {
                if *steps <= 0 || *steps > u32::MAX as i64 {
                    errors.push(format!("[motor.{}] max_seek_steps must be positive", name));
                }
            }
            Some(_) => errors.push(format!("[motor.{}] max_seek_steps must be an integer", name)),
            None => {}
        }
    }

    report("Invalid motor configuration", &errors);
}

/// Validate the [stream] section
fn validate_stream(config: &toml::Value) {
    let stream = match config.get("stream") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            report("Invalid stream configuration", &["[stream] must be a table".to_string()]);
            return;
        }
        // Defaults apply
        None => return,
    };

    let mut errors = Vec::new();

    if let Some(toml::Value::Integer(port)) = stream.get("port") {
        if *port < 1 || *port > 65535 {
            errors.push("[stream] port must be 1-65535".to_string());
        }
    }

    if let Some(toml::Value::Integer(fps)) = stream.get("fps") {
        if *fps < 1 || *fps > 240 {
            errors.push("[stream] fps must be 1-240".to_string());
        }
    }

    if let Some(toml::Value::String(res)) = stream.get("resolution") {
        let valid = res
            .split_once('x')
            .map(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok())
            .unwrap_or(false);
        if !valid {
            errors.push("[stream] resolution must look like '1280x720'".to_string());
        }
    }

    for key in ["command", "input_plugin", "device", "output_plugin", "www_dir", "host"] {
        match stream.get(key) {
            Some(toml::Value::String(s)) if s.is_empty() => {
                errors.push(format!("[stream] {} cannot be empty", key));
            }
            Some(toml::Value::String(_)) | None => {}
            Some(_) => errors.push(format!("[stream] {} must be a string", key)),
        }
    }

    report("Invalid stream configuration", &errors);
}
