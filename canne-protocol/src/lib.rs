//! Canne Serial Line Protocol
//!
//! This crate defines the text protocol spoken between the host (the vision
//! and audio pipeline on the Raspberry Pi) and the cane controller. The
//! protocol is line based and human readable so it can be driven from any
//! serial terminal.
//!
//! # Protocol Overview
//!
//! Queued deployments take one single-zone command per line:
//! ```text
//! <ZONE> <intensity> <duration_ms>\n      e.g. "UPP 255 5000"
//! STOP\n                                  cancel everything
//! ```
//!
//! Mirror deployments take a fixed-format frame that replaces the whole
//! output state at once:
//! ```text
//! L<int>C<int>R<int>\n                    e.g. "L040C100R000"
//! ```
//!
//! Parsing never allocates: lines are bounded by [`MAX_LINE_LEN`] and zone
//! codes are matched from a fixed stack buffer.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod lcr;
pub mod line;
pub mod zone;

pub use command::{parse_command, parse_line, Command, LineCommand, ParseError, STOP_KEYWORD};
pub use lcr::{parse_lcr, LcrFrame};
pub use line::{Line, LineAssembler, MAX_LINE_LEN};
pub use zone::{Zone, ZoneSet, ZONE_CODE_LEN, ZONE_COUNT};
