//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware fills these from
//! its embedded `device.toml`.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
