//! Configuration type definitions
//!
//! These types represent the device configuration loaded at boot.

use canne_protocol::{Zone, ZoneSet};

use super::hardware::{ActuatorBackend, LedStripHwConfig, PwmHwConfig, MAX_PIXELS};
use crate::controller::mirror::DEFAULT_INACTIVITY_TIMEOUT_MS;

/// Default control loop period
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1;

/// Default serial baud rate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// How incoming lines are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// `<ZONE> <intensity> <duration>` commands played one at a time
    #[default]
    Queued,
    /// `L<int>C<int>R<int>` frames applied immediately, cleared on silence
    Mirror,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No zone is enabled
    NoZones,
    /// Tick interval must be at least 1 ms
    InvalidTickInterval,
    /// Inactivity window shorter than one tick
    InvalidInactivityTimeout,
    /// PWM top or divider is zero
    InvalidPwm,
    /// LED strip is empty or larger than supported
    InvalidPixelCount,
    /// A zone maps to a pixel outside the strip
    PixelOutOfRange(Zone),
    /// Two zones map to the same pixel
    DuplicatePixel(Zone),
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Line protocol in use
    pub mode: DeviceMode,
    /// Output back end
    pub backend: ActuatorBackend,
    /// Zones fitted on this cane
    pub zones: ZoneSet,
    /// Control loop period (ms)
    pub tick_interval_ms: u32,
    /// Mirror mode: clear outputs after this long without a frame (ms)
    pub inactivity_timeout_ms: u32,
    /// Serial baud rate
    pub baudrate: u32,
    /// PWM back end settings
    pub pwm: PwmHwConfig,
    /// LED strip back end settings
    pub led_strip: LedStripHwConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mode: DeviceMode::Queued,
            backend: ActuatorBackend::Pwm,
            zones: ZoneSet::all(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            inactivity_timeout_ms: DEFAULT_INACTIVITY_TIMEOUT_MS,
            baudrate: DEFAULT_BAUDRATE,
            pwm: PwmHwConfig::default(),
            led_strip: LedStripHwConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        if self.inactivity_timeout_ms < self.tick_interval_ms {
            return Err(ConfigError::InvalidInactivityTimeout);
        }
        if self.pwm.top == 0 || self.pwm.divider == 0 {
            return Err(ConfigError::InvalidPwm);
        }
        if self.backend == ActuatorBackend::LedStrip {
            self.validate_led_strip()?;
        }
        Ok(())
    }

    fn validate_led_strip(&self) -> Result<(), ConfigError> {
        let strip = &self.led_strip;
        let count = usize::from(strip.pixel_count);
        if count == 0 || count > MAX_PIXELS {
            return Err(ConfigError::InvalidPixelCount);
        }

        let mut used = [false; MAX_PIXELS];
        for zone in Zone::ALL {
            if !self.zones.contains(zone) {
                continue;
            }
            let Some(pixel) = strip.pixel_for(zone) else {
                continue;
            };
            if pixel >= count {
                return Err(ConfigError::PixelOutOfRange(zone));
            }
            if used[pixel] {
                return Err(ConfigError::DuplicatePixel(zone));
            }
            used[pixel] = true;
        }
        Ok(())
    }
}
