//! Mirror-mode output tracking
//!
//! In mirror mode every frame replaces the whole output state at once. The
//! host is expected to stream frames continuously; when it goes quiet for
//! longer than the inactivity window, the outputs are cleared so a lost
//! link never leaves a motor running.

use canne_protocol::LcrFrame;

use crate::traits::{Actuator, Millis};

/// Default inactivity window before outputs are cleared
pub const DEFAULT_INACTIVITY_TIMEOUT_MS: u32 = 200;

/// Replace-immediately controller with an inactivity clear
#[derive(Debug, Clone)]
pub struct MirrorController {
    timeout_ms: Millis,
    /// Time of the last applied frame, None once cleared
    last_input: Option<Millis>,
}

impl Default for MirrorController {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVITY_TIMEOUT_MS)
    }
}

impl MirrorController {
    /// Create a controller with the given inactivity window
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms: timeout_ms as Millis,
            last_input: None,
        }
    }

    /// Apply a frame to all zones and restart the inactivity window
    pub fn apply<A: Actuator>(&mut self, frame: &LcrFrame, now: Millis, actuator: &mut A) {
        actuator.apply_frame(frame);
        self.last_input = Some(now);
    }

    /// Check the inactivity window
    ///
    /// Returns true on the tick that cleared the outputs. Only fires once per
    /// silence; the next frame re-arms it.
    pub fn tick<A: Actuator>(&mut self, now: Millis, actuator: &mut A) -> bool {
        let Some(last) = self.last_input else {
            return false;
        };
        if now.saturating_sub(last) < self.timeout_ms {
            return false;
        }
        actuator.clear_all();
        self.last_input = None;
        true
    }

    /// Clear all outputs immediately
    pub fn stop<A: Actuator>(&mut self, actuator: &mut A) {
        actuator.clear_all();
        self.last_input = None;
    }

    /// Check if a frame is currently being held
    pub fn is_active(&self) -> bool {
        self.last_input.is_some()
    }

    /// Time of the last frame still being held
    pub fn last_input(&self) -> Option<Millis> {
        self.last_input
    }
}
