//! Incoming command lines

use canne_protocol::Line;

/// Trait for the serial line source
pub trait LineSource {
    /// Take the next complete line, if one is ready
    ///
    /// Must not block. Lines are already trimmed and never empty.
    fn poll_line(&mut self) -> Option<Line>;
}
