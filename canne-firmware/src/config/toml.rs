//! Simple TOML parser for device configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `device.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Single-line arrays of strings: zones = ["UPP", "GAU"]
//! - Comments (# ...)
//!
//! Unknown keys are ignored so older firmware accepts newer files.

use canne_core::config::{ActuatorBackend, DeviceConfig, DeviceMode};
use canne_core::{Zone, ZoneSet};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Zone code not recognized
    InvalidZone,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Device,
    Pwm,
    LedStrip,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "device" => Ok(Section::Device),
        "pwm" => Ok(Section::Pwm),
        "led_strip" => Ok(Section::LedStrip),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseError> {
    let mut result: u64 = 0;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '_' => continue,
            '0'..='9' => {
                result = result
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(u64::from(c as u8 - b'0')))
                    .ok_or(ParseError::InvalidValue)?;
                digits += 1;
            }
            _ => return Err(ParseError::InvalidValue),
        }
    }
    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }
    T::try_from(result).map_err(|_| ParseError::InvalidValue)
}

fn parse_mode(value: &str) -> Result<DeviceMode, ParseError> {
    match parse_string(value) {
        "queued" => Ok(DeviceMode::Queued),
        "mirror" => Ok(DeviceMode::Mirror),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_backend(value: &str) -> Result<ActuatorBackend, ParseError> {
    match parse_string(value) {
        "pwm" => Ok(ActuatorBackend::Pwm),
        "led_strip" => Ok(ActuatorBackend::LedStrip),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a zone list like ["UPP", "GAU", "DRO"]
fn parse_zones(value: &str) -> Result<ZoneSet, ParseError> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    let mut zones = ZoneSet::empty();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let code = parse_string(item).as_bytes();
        let code: [u8; 3] = code.try_into().map_err(|_| ParseError::InvalidZone)?;
        zones.insert(Zone::from_code(code).ok_or(ParseError::InvalidZone)?);
    }
    Ok(zones)
}

/// Parse a pixel index, or "none"
fn parse_pixel(value: &str) -> Result<Option<u8>, ParseError> {
    if parse_string(value) == "none" {
        return Ok(None);
    }
    parse_int(value).map(Some)
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Device => match key {
            "mode" => config.mode = parse_mode(value)?,
            "backend" => config.backend = parse_backend(value)?,
            "zones" => config.zones = parse_zones(value)?,
            "tick_interval_ms" => config.tick_interval_ms = parse_int(value)?,
            "inactivity_timeout_ms" => config.inactivity_timeout_ms = parse_int(value)?,
            "baudrate" => config.baudrate = parse_int(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Pwm => match key {
            "top" => config.pwm.top = parse_int(value)?,
            "divider" => config.pwm.divider = parse_int(value)?,
            _ => {}
        },
        Section::LedStrip => {
            let strip = &mut config.led_strip;
            let zone = match key {
                "pixel_count" => {
                    strip.pixel_count = parse_int(value)?;
                    return Ok(());
                }
                "brightness" => {
                    strip.brightness = parse_int(value)?;
                    return Ok(());
                }
                "up" => Zone::Up,
                "left" => Zone::Left,
                "right" => Zone::Right,
                "bottom" => Zone::Bottom,
                _ => return Ok(()),
            };
            strip.pixel_map[zone.index()] = parse_pixel(value)?;
        }
        Section::Root => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("device"), Ok(Section::Device));
        assert_eq!(parse_section_header(" led_strip "), Ok(Section::LedStrip));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_zones() {
        let zones = parse_zones(r#"["UPP", "GAU", "DRO"]"#).unwrap();
        assert_eq!(zones, ZoneSet::three_zone());
        assert_eq!(parse_zones(r#"["UPP", "XYZ"]"#), Err(ParseError::InvalidZone));
        assert_eq!(parse_zones("UPP"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("-1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>(""), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_device_config() {
        let config_str = r#"
[device]
mode = "mirror"   # LCR frames
backend = "led_strip"
zones = ["UPP", "GAU", "DRO"]
inactivity_timeout_ms = 500

[led_strip]
pixel_count = 4
left = 3
bottom = "none"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.mode, DeviceMode::Mirror);
        assert_eq!(config.backend, ActuatorBackend::LedStrip);
        assert_eq!(config.zones.len(), 3);
        assert_eq!(config.inactivity_timeout_ms, 500);
        assert_eq!(config.tick_interval_ms, 1);
        assert_eq!(config.led_strip.pixel_for(Zone::Left), Some(3));
        assert_eq!(config.led_strip.pixel_for(Zone::Bottom), None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(include_str!("../../device.toml")).unwrap();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert_eq!(
            parse_config("[device]\nmode = \"burst\""),
            Err(ParseError::InvalidValue)
        );
    }
}
