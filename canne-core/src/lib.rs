//! Board-agnostic core logic for the cane firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (actuator, clock, line source)
//! - Fixed-capacity command queue
//! - Non-blocking actuation scheduler
//! - Mirror-mode output tracking with inactivity clear
//! - The per-tick controller tying them together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod controller;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use canne_protocol::{Command, LcrFrame, ParseError, Zone, ZoneSet, ZONE_COUNT};
