//! Hardware configuration types
//!
//! Output back end settings for PWM vibration motors and addressable LEDs.

use canne_protocol::{Zone, ZONE_COUNT};

/// Largest LED strip the firmware drives
pub const MAX_PIXELS: usize = 8;

/// Output back end fitted on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorBackend {
    /// One PWM channel per zone driving a vibration motor
    #[default]
    Pwm,
    /// WS2812 strip, one pixel per zone (visual debugging rig)
    LedStrip,
}

/// PWM output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmHwConfig {
    /// Counter top value (sets resolution and frequency)
    pub top: u16,
    /// Integer clock divider
    pub divider: u8,
}

impl Default for PwmHwConfig {
    fn default() -> Self {
        // 125 MHz / 2 / 2500 = 25 kHz, above the audible range
        Self {
            top: 2500,
            divider: 2,
        }
    }
}

/// Addressable LED strip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedStripHwConfig {
    /// Number of pixels on the strip
    pub pixel_count: u8,
    /// Global brightness cap (0-255)
    pub brightness: u8,
    /// Pixel index for each zone, indexed by [`Zone::index`]
    pub pixel_map: [Option<u8>; ZONE_COUNT],
}

impl Default for LedStripHwConfig {
    fn default() -> Self {
        // Three-pixel bar: left, centre (up), right
        let mut pixel_map = [None; ZONE_COUNT];
        pixel_map[Zone::Left.index()] = Some(0);
        pixel_map[Zone::Up.index()] = Some(1);
        pixel_map[Zone::Right.index()] = Some(2);
        Self {
            pixel_count: 3,
            brightness: 100,
            pixel_map,
        }
    }
}

impl LedStripHwConfig {
    /// Pixel driven by a zone, if the zone has one
    pub fn pixel_for(&self, zone: Zone) -> Option<usize> {
        self.pixel_map[zone.index()].map(usize::from)
    }
}
