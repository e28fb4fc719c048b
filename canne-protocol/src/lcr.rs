//! Left/Centre/Right mirror frames
//!
//! Frame format (no separators):
//! - `L` followed by the left intensity
//! - `C` followed by the centre intensity
//! - `R` followed by the right intensity
//!
//! Each value is a percentage; out-of-range values are clamped to 0-100 and
//! then rescaled to the 0-255 output range.

use crate::command::ParseError;

/// Largest percentage accepted from the host
pub const MAX_PERCENT: i32 = 100;

/// Maximum digits per field (keeps the value inside an `i32`)
const MAX_DIGITS: usize = 9;

/// A full output state for the three front zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LcrFrame {
    /// Left intensity (0-255)
    pub left: u8,
    /// Centre intensity (0-255)
    pub center: u8,
    /// Right intensity (0-255)
    pub right: u8,
}

impl LcrFrame {
    /// Build a frame from raw percentages, clamping and rescaling each
    pub fn from_percent(left: i32, center: i32, right: i32) -> Self {
        Self {
            left: rescale(left),
            center: rescale(center),
            right: rescale(right),
        }
    }
}

/// Clamp a percentage to 0-100 and map it onto 0-255
fn rescale(percent: i32) -> u8 {
    let clamped = percent.clamp(0, MAX_PERCENT) as u32;
    (clamped * 255 / MAX_PERCENT as u32) as u8
}

/// Parse an `L<int>C<int>R<int>` frame
pub fn parse_lcr(line: &str) -> Result<LcrFrame, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (left, rest) = take_field(line, b'L')?;
    let (center, rest) = take_field(rest, b'C')?;
    let (right, rest) = take_field(rest, b'R')?;
    if !rest.is_empty() {
        return Err(ParseError::TrailingInput);
    }

    Ok(LcrFrame::from_percent(left, center, right))
}

/// Consume `<tag><int>` from the front of `input`
fn take_field(input: &str, tag: u8) -> Result<(i32, &str), ParseError> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&tag) {
        return Err(ParseError::MissingField);
    }

    let mut pos = 1;
    let negative = bytes.get(pos) == Some(&b'-');
    if negative {
        pos += 1;
    }

    let digits_start = pos;
    let mut value: i32 = 0;
    while let Some(&byte) = bytes.get(pos) {
        if !byte.is_ascii_digit() {
            break;
        }
        if pos - digits_start == MAX_DIGITS {
            return Err(ParseError::InvalidNumber);
        }
        value = value * 10 + i32::from(byte - b'0');
        pos += 1;
    }

    if pos == digits_start {
        return Err(ParseError::InvalidNumber);
    }

    let value = if negative { -value } else { value };
    Ok((value, &input[pos..]))
}
