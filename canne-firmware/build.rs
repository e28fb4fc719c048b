//! Build script for canne-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const ZONE_CODES: [&str; 4] = ["UPP", "GAU", "DRO", "BOT"];
const PIXEL_KEYS: [&str; 4] = ["up", "left", "right", "bottom"];
const MAX_PIXELS: i64 = 8;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a device.toml configuration file.           ║\n\
            ║  Please create one in the canne-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_device(&config, &mut errors);
    validate_pwm(&config, &mut errors);
    validate_led_strip(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in device.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check an optional integer key against an inclusive range
fn check_range(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_device(config: &toml::Value, errors: &mut Vec<String>) {
    let device = match config.get("device") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[device] must be a table".to_string());
            return;
        }
        None => return,
    };

    if let Some(mode) = device.get("mode") {
        if !matches!(mode.as_str(), Some("queued") | Some("mirror")) {
            errors.push("[device] mode must be 'queued' or 'mirror'".to_string());
        }
    }

    if let Some(backend) = device.get("backend") {
        if !matches!(backend.as_str(), Some("pwm") | Some("led_strip")) {
            errors.push("[device] backend must be 'pwm' or 'led_strip'".to_string());
        }
    }

    match device.get("zones") {
        None => {}
        Some(toml::Value::Array(zones)) => {
            if zones.is_empty() {
                errors.push("[device] zones cannot be empty".to_string());
            }
            for zone in zones {
                match zone.as_str() {
                    Some(code) if ZONE_CODES.contains(&code) => {}
                    _ => errors.push(format!("[device] unknown zone {}", zone)),
                }
            }
        }
        Some(_) => errors.push("[device] zones must be an array".to_string()),
    }

    check_range(device, "device", "tick_interval_ms", 1, 1000, errors);
    check_range(device, "device", "inactivity_timeout_ms", 1, 60_000, errors);
    check_range(device, "device", "baudrate", 1200, 1_000_000, errors);

    let tick = device
        .get("tick_interval_ms")
        .and_then(|v| v.as_integer())
        .unwrap_or(1);
    let timeout = device
        .get("inactivity_timeout_ms")
        .and_then(|v| v.as_integer())
        .unwrap_or(200);
    if timeout < tick {
        errors.push("[device] inactivity_timeout_ms is shorter than one tick".to_string());
    }
}

fn validate_pwm(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(pwm)) = config.get("pwm") else {
        return;
    };
    check_range(pwm, "pwm", "top", 1, 65_535, errors);
    check_range(pwm, "pwm", "divider", 1, 255, errors);
}

fn validate_led_strip(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(strip)) = config.get("led_strip") else {
        return;
    };
    check_range(strip, "led_strip", "pixel_count", 1, MAX_PIXELS, errors);
    check_range(strip, "led_strip", "brightness", 0, 255, errors);

    let pixel_count = strip
        .get("pixel_count")
        .and_then(|v| v.as_integer())
        .unwrap_or(3);

    let mut used = Vec::new();
    for key in PIXEL_KEYS {
        match strip.get(key) {
            None => {}
            Some(toml::Value::String(s)) if s == "none" => {}
            Some(toml::Value::Integer(pixel)) => {
                if *pixel < 0 || *pixel >= pixel_count {
                    errors.push(format!(
                        "[led_strip] {} must be below pixel_count ({})",
                        key, pixel_count
                    ));
                } else if used.contains(pixel) {
                    errors.push(format!("[led_strip] {} reuses pixel {}", key, pixel));
                } else {
                    used.push(*pixel);
                }
            }
            Some(_) => errors.push(format!(
                "[led_strip] {} must be a pixel index or \"none\"",
                key
            )),
        }
    }
}
