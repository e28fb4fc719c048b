//! Configuration loading and parsing
//!
//! The device configuration is compiled into the firmware from
//! `device.toml` and parsed at boot by a small no_std parser.

pub mod toml;

use defmt::*;

use canne_core::config::DeviceConfig;

pub use toml::parse_config;

/// Embedded configuration (edit device.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../../device.toml");

/// Load the embedded configuration
///
/// Falls back to defaults if the file cannot be parsed or describes a
/// device the firmware cannot run.
pub fn load() -> DeviceConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("device.toml parse error: {:?}, using defaults", e);
            return DeviceConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        warn!("device.toml rejected: {:?}, using defaults", e);
        return DeviceConfig::default();
    }

    log_config_summary(&config);
    config
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &DeviceConfig) {
    info!("Configuration loaded successfully");
    debug!("  mode: {:?}", config.mode);
    debug!("  backend: {:?}", config.backend);
    debug!("  {} zones", config.zones.len());
    debug!("  tick: {} ms", config.tick_interval_ms);
}
