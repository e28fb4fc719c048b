//! Tick outcomes
//!
//! Everything the controller does in a tick is reported as an [`Event`],
//! so the firmware can log it without the core knowing about logging.

pub mod events;

pub use events::{CommandError, Event};
