//! Vibration motors on PWM channels
//!
//! One channel per zone. Intensity 0-255 maps linearly onto the channel's
//! duty range, so the driver works with whatever counter top the board
//! configures.
//!
//! ```ignore
//! let mut outputs = PwmActuator::new([Some(up), Some(left), Some(right), None]);
//! outputs.apply_zone(Zone::Up, 255);
//! outputs.clear_all();
//! ```

use canne_core::traits::Actuator;
use canne_core::{Zone, ZoneSet, ZONE_COUNT};
use embedded_hal::pwm::SetDutyCycle;

/// Full-scale intensity
const MAX_INTENSITY: u16 = 255;

/// PWM back end
///
/// Zones without a channel are silently ignored, which is how three-zone
/// canes run without a bottom motor.
pub struct PwmActuator<P> {
    /// Channel per zone, indexed by [`Zone::index`]
    channels: [Option<P>; ZONE_COUNT],
    /// Last intensity written per zone
    levels: [u8; ZONE_COUNT],
}

impl<P: SetDutyCycle> PwmActuator<P> {
    /// Create a back end from channels indexed by [`Zone::index`]
    ///
    /// Every channel is switched off immediately.
    pub fn new(channels: [Option<P>; ZONE_COUNT]) -> Self {
        let mut actuator = Self {
            channels,
            levels: [0; ZONE_COUNT],
        };
        actuator.clear_all();
        actuator
    }

    /// Zones that have a channel
    pub fn fitted(&self) -> ZoneSet {
        let mut zones = ZoneSet::empty();
        for zone in Zone::ALL {
            if self.channels[zone.index()].is_some() {
                zones.insert(zone);
            }
        }
        zones
    }

    /// Last intensity successfully written to a zone
    pub fn level(&self, zone: Zone) -> u8 {
        self.levels[zone.index()]
    }

    /// Release the channels
    pub fn release(self) -> [Option<P>; ZONE_COUNT] {
        self.channels
    }
}

impl<P: SetDutyCycle> Actuator for PwmActuator<P> {
    fn apply_zone(&mut self, zone: Zone, intensity: u8) {
        let Some(channel) = self.channels[zone.index()].as_mut() else {
            return;
        };
        // On a failed write the level keeps its last known value
        if channel
            .set_duty_cycle_fraction(u16::from(intensity), MAX_INTENSITY)
            .is_ok()
        {
            self.levels[zone.index()] = intensity;
        }
    }

    fn clear_all(&mut self) {
        for (level, channel) in self.levels.iter_mut().zip(self.channels.iter_mut()) {
            let Some(channel) = channel.as_mut() else {
                continue;
            };
            if channel.set_duty_cycle_fully_off().is_ok() {
                *level = 0;
            }
        }
    }
}
