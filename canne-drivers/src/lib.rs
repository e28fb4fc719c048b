//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the [`Actuator`] trait
//! defined in canne-core:
//!
//! - Vibration motors on PWM channels (any embedded-hal 1.0 `SetDutyCycle`)
//! - Addressable LED strip, one pixel per zone
//!
//! [`Actuator`]: canne_core::traits::Actuator

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod led_strip;
pub mod pwm;

pub use led_strip::{intensity_to_color, LedStripActuator, ARMED_COLOR};
pub use pwm::PwmActuator;
