//! Single-zone command grammar
//!
//! Line format:
//! - ZONE (3 chars): one of `UPP`, `GAU`, `DRO`, `BOT`
//! - INTENSITY: unsigned decimal, 0-255
//! - DURATION: unsigned decimal milliseconds, fits in a `u32`
//!
//! Fields are separated by ASCII whitespace. A line either matches fully or
//! is rejected as a whole. The bare word `STOP` cancels the active action.

use crate::zone::{Zone, ZONE_CODE_LEN};

/// Keyword that cancels the active action and clears all outputs
pub const STOP_KEYWORD: &str = "STOP";

/// Errors that can occur while parsing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line is empty after trimming
    Empty,
    /// Fewer fields than the grammar requires
    MissingField,
    /// Extra data after the last field
    TrailingInput,
    /// Zone code is not recognized (or not fitted on this device)
    UnknownZone,
    /// A numeric field contains something other than digits
    InvalidNumber,
    /// Intensity is above 255
    IntensityOutOfRange,
    /// Duration does not fit in 32 bits
    DurationOutOfRange,
    /// Line exceeded the maximum length before its terminator
    LineTooLong,
    /// Line is not valid UTF-8
    InvalidEncoding,
}

/// One requested actuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Zone to drive
    pub zone: Zone,
    /// Output level (0 = off, 255 = full)
    pub intensity: u8,
    /// How long to hold the output, in milliseconds
    pub duration_ms: u32,
}

impl Command {
    /// Create a new command
    pub const fn new(zone: Zone, intensity: u8, duration_ms: u32) -> Self {
        Self {
            zone,
            intensity,
            duration_ms,
        }
    }
}

/// Anything a queued-mode line can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineCommand {
    /// Queue a single-zone actuation
    Actuate(Command),
    /// Clear all outputs and drop back to idle
    Stop,
}

/// Parse a single-zone command line
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut fields = line.split_ascii_whitespace();

    let zone = fields.next().ok_or(ParseError::Empty)?;
    let intensity = fields.next().ok_or(ParseError::MissingField)?;
    let duration = fields.next().ok_or(ParseError::MissingField)?;
    if fields.next().is_some() {
        return Err(ParseError::TrailingInput);
    }

    let zone = parse_zone(zone)?;
    let intensity = match parse_decimal(intensity) {
        Ok(value) => u8::try_from(value).map_err(|_| ParseError::IntensityOutOfRange)?,
        Err(NumberError::Overflow) => return Err(ParseError::IntensityOutOfRange),
        Err(NumberError::Invalid) => return Err(ParseError::InvalidNumber),
    };
    let duration_ms = match parse_decimal(duration) {
        Ok(value) => value,
        Err(NumberError::Overflow) => return Err(ParseError::DurationOutOfRange),
        Err(NumberError::Invalid) => return Err(ParseError::InvalidNumber),
    };

    Ok(Command {
        zone,
        intensity,
        duration_ms,
    })
}

/// Parse a queued-mode line, recognizing `STOP` as well as commands
pub fn parse_line(line: &str) -> Result<LineCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if line == STOP_KEYWORD {
        return Ok(LineCommand::Stop);
    }
    parse_command(line).map(LineCommand::Actuate)
}

/// Match a zone code through a fixed stack buffer
fn parse_zone(field: &str) -> Result<Zone, ParseError> {
    let bytes = field.as_bytes();
    if bytes.len() != ZONE_CODE_LEN {
        return Err(ParseError::UnknownZone);
    }
    let mut code = [0u8; ZONE_CODE_LEN];
    code.copy_from_slice(bytes);
    Zone::from_code(code).ok_or(ParseError::UnknownZone)
}

enum NumberError {
    Invalid,
    Overflow,
}

/// Parse unsigned decimal digits (no sign, no whitespace)
fn parse_decimal(field: &str) -> Result<u32, NumberError> {
    if field.is_empty() {
        return Err(NumberError::Invalid);
    }

    let mut value: u32 = 0;
    for byte in field.bytes() {
        if !byte.is_ascii_digit() {
            return Err(NumberError::Invalid);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(byte - b'0')))
            .ok_or(NumberError::Overflow)?;
    }
    Ok(value)
}
