//! Line framing for the serial link
//!
//! Bytes arrive from the UART in arbitrary chunks. The assembler collects
//! them into a bounded buffer and yields one trimmed, non-empty line per
//! `\n` terminator. Carriage returns are dropped so CRLF senders work too.

use heapless::{String, Vec};

use crate::command::ParseError;

/// Maximum line length in bytes (excluding the terminator)
pub const MAX_LINE_LEN: usize = 32;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// A complete, trimmed line
pub type Line = String<MAX_LINE_LEN>;

/// State machine for assembling incoming lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Set once the current line overflowed; bytes are skipped until LINE_END
    discarding: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create a new line assembler
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Reset the assembler state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed (or the line was blank),
    /// or `Err` when the finished line was unusable.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, ParseError> {
        match byte {
            LINE_END => {
                if self.discarding {
                    self.reset();
                    return Err(ParseError::LineTooLong);
                }
                let result = Self::finish(&self.buffer);
                self.reset();
                result
            }
            b'\r' => Ok(None),
            _ if self.discarding => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                }
                Ok(None)
            }
        }
    }

    fn finish(bytes: &[u8]) -> Result<Option<Line>, ParseError> {
        let text = core::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        // Cannot fail: the trimmed text is no longer than the buffer
        Line::try_from(text)
            .map(Some)
            .map_err(|_| ParseError::LineTooLong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(assembler: &mut LineAssembler, bytes: &[u8]) -> Result<Option<Line>, ParseError> {
        let mut last = Ok(None);
        for &byte in bytes {
            last = assembler.feed(byte);
            if !matches!(last, Ok(None)) {
                return last;
            }
        }
        last
    }

    #[test]
    fn test_single_line() {
        let mut assembler = LineAssembler::new();
        let line = feed_all(&mut assembler, b"UPP 255 5000\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "UPP 255 5000");
    }

    #[test]
    fn test_crlf_and_whitespace_trimmed() {
        let mut assembler = LineAssembler::new();
        let line = feed_all(&mut assembler, b"  STOP \r\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "STOP");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.feed(b'\n'), Ok(None));
        assert_eq!(feed_all(&mut assembler, b"   \r\n"), Ok(None));
    }

    #[test]
    fn test_partial_line_waits() {
        let mut assembler = LineAssembler::new();
        assert_eq!(feed_all(&mut assembler, b"GAU 10"), Ok(None));
        let line = feed_all(&mut assembler, b"0 1000\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "GAU 100 1000");
    }

    #[test]
    fn test_overlong_line_discarded_then_recovers() {
        let mut assembler = LineAssembler::new();
        let long = [b'A'; MAX_LINE_LEN + 5];
        assert_eq!(feed_all(&mut assembler, &long), Ok(None));
        assert_eq!(assembler.feed(b'\n'), Err(ParseError::LineTooLong));

        let line = feed_all(&mut assembler, b"DRO 1 1\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "DRO 1 1");
    }

    #[test]
    fn test_line_at_capacity_accepted() {
        let mut assembler = LineAssembler::new();
        let exact = [b'B'; MAX_LINE_LEN];
        assert_eq!(feed_all(&mut assembler, &exact), Ok(None));
        let line = assembler.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut assembler = LineAssembler::new();
        assert_eq!(
            feed_all(&mut assembler, &[0xFF, 0xFE, b'\n']),
            Err(ParseError::InvalidEncoding)
        );
        // Next line is unaffected
        assert!(feed_all(&mut assembler, b"STOP\n").unwrap().is_some());
    }
}
