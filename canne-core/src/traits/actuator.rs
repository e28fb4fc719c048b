//! Actuator output trait
//!
//! Every output back end (PWM vibration motors, addressable LED strip, ...)
//! implements this trait so the scheduling logic stays identical across
//! deployments.

use canne_protocol::{LcrFrame, Zone};

/// Trait for zone outputs
///
/// Implementations own no domain logic: they map a zone and an intensity
/// onto whatever physical output the board carries.
pub trait Actuator {
    /// Drive a single zone at the given intensity (0 = off, 255 = full)
    ///
    /// Other zones are left as they are.
    fn apply_zone(&mut self, zone: Zone, intensity: u8);

    /// Turn every zone off
    ///
    /// Must be safe to call when everything is already off.
    fn clear_all(&mut self);

    /// Replace the whole output state with a mirror frame
    ///
    /// The centre value drives the up zone; the bottom zone is switched off.
    fn apply_frame(&mut self, frame: &LcrFrame) {
        self.apply_zone(Zone::Left, frame.left);
        self.apply_zone(Zone::Up, frame.center);
        self.apply_zone(Zone::Right, frame.right);
        self.apply_zone(Zone::Bottom, 0);
    }
}
