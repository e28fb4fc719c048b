//! Addressable LED strip back end
//!
//! Visual stand-in for the vibration motors: one pixel per zone, coloured
//! from green (gentle) to red (strong). Writing pixels is synchronous; the
//! firmware pushes the buffer out to the strip whenever it is marked dirty.
//!
//! Colour mapping:
//! - hue 96 (green) at intensity 0 down to hue 0 (red) at 255
//! - value 50 just above 0 up to 255
//! - a zone set to exactly 0 shows plain green (armed); only `clear_all`
//!   goes dark

use canne_core::config::LedStripHwConfig;
use canne_core::traits::Actuator;
use canne_core::{Zone, ZONE_COUNT};
use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::RGB8;

const HUE_GENTLE: u16 = 96;
const VALUE_MIN: u16 = 50;
const VALUE_MAX: u16 = 255;

/// Colour of a zone driven at zero intensity
pub const ARMED_COLOR: RGB8 = RGB8 { r: 0, g: 128, b: 0 };

/// Colour shown for a zone at the given intensity
pub fn intensity_to_color(intensity: u8) -> RGB8 {
    if intensity == 0 {
        return ARMED_COLOR;
    }
    let i = u16::from(intensity);
    let hue = HUE_GENTLE - i * HUE_GENTLE / 255;
    let val = VALUE_MIN + i * (VALUE_MAX - VALUE_MIN) / 255;
    hsv2rgb(Hsv {
        hue: hue as u8,
        sat: 255,
        val: val as u8,
    })
}

/// LED strip back end with `N` pixels
pub struct LedStripActuator<const N: usize> {
    pixels: [RGB8; N],
    /// Pixel per zone, indexed by [`Zone::index`]
    pixel_map: [Option<usize>; ZONE_COUNT],
    brightness: u8,
    dirty: bool,
}

impl<const N: usize> LedStripActuator<N> {
    /// Create a dark strip from the configured pixel map
    ///
    /// Zones mapped past the end of the strip are dropped from the map.
    pub fn new(config: &LedStripHwConfig) -> Self {
        let mut pixel_map = [None; ZONE_COUNT];
        for zone in Zone::ALL {
            pixel_map[zone.index()] = config.pixel_for(zone).filter(|&p| p < N);
        }
        Self {
            pixels: [RGB8::default(); N],
            pixel_map,
            brightness: config.brightness,
            // Push the dark frame on the first flush
            dirty: true,
        }
    }

    /// Raw (unscaled) pixel colours
    pub fn pixels(&self) -> &[RGB8; N] {
        &self.pixels
    }

    /// Pixel colours scaled by the global brightness
    pub fn render(&self) -> [RGB8; N] {
        let mut out = [RGB8::default(); N];
        let scaled = smart_leds::brightness(self.pixels.iter().copied(), self.brightness);
        for (dst, src) in out.iter_mut().zip(scaled) {
            *dst = src;
        }
        out
    }

    /// Check whether the strip needs to be rewritten
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Take the dirty flag, returning the frame to write if it was set
    pub fn take_frame(&mut self) -> Option<[RGB8; N]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.render())
    }
}

impl<const N: usize> Actuator for LedStripActuator<N> {
    fn apply_zone(&mut self, zone: Zone, intensity: u8) {
        if let Some(pixel) = self.pixel_map[zone.index()] {
            self.pixels[pixel] = intensity_to_color(intensity);
            self.dirty = true;
        }
    }

    fn clear_all(&mut self) {
        self.pixels = [RGB8::default(); N];
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canne_core::LcrFrame;

    fn strip() -> LedStripActuator<3> {
        LedStripActuator::new(&LedStripHwConfig {
            brightness: 255,
            ..Default::default()
        })
    }

    #[test]
    fn test_color_range() {
        let full = intensity_to_color(255);
        assert!(full.r > 200);
        assert_eq!(full.g, 0);

        assert_eq!(intensity_to_color(0), RGB8::new(0, 128, 0));

        let gentle = intensity_to_color(1);
        assert!(gentle.g > 0);
        assert!(gentle.r < gentle.g);
        assert!(gentle.g <= 51);
    }

    #[test]
    fn test_zone_to_pixel() {
        let mut strip = strip();
        let _ = strip.take_frame();

        strip.apply_zone(Zone::Right, 255);
        assert!(strip.is_dirty());
        assert_eq!(strip.pixels()[2], intensity_to_color(255));
        assert_eq!(strip.pixels()[0], RGB8::default());
    }

    #[test]
    fn test_unmapped_zone_is_ignored() {
        let mut strip = strip();
        let _ = strip.take_frame();

        strip.apply_zone(Zone::Bottom, 255);
        assert!(!strip.is_dirty());
        assert!(strip.pixels().iter().all(|p| *p == RGB8::default()));
    }

    #[test]
    fn test_mirror_frame_and_clear() {
        let mut strip = strip();
        strip.apply_frame(&LcrFrame::from_percent(0, 100, 50));
        assert_eq!(strip.pixels()[0], intensity_to_color(0));
        assert_eq!(strip.pixels()[1], intensity_to_color(255));

        strip.clear_all();
        assert!(strip.pixels().iter().all(|p| *p == RGB8::default()));
    }

    #[test]
    fn test_take_frame_clears_dirty() {
        let mut strip = strip();
        assert!(strip.take_frame().is_some());
        assert!(strip.take_frame().is_none());

        strip.apply_zone(Zone::Up, 10);
        assert_eq!(strip.take_frame().map(|f| f[1]), Some(intensity_to_color(10)));
        assert!(!strip.is_dirty());
    }

    #[test]
    fn test_brightness_scales_output() {
        let mut strip = LedStripActuator::<3>::new(&LedStripHwConfig {
            brightness: 0,
            ..Default::default()
        });
        strip.apply_zone(Zone::Up, 255);
        assert!(strip.render().iter().all(|p| *p == RGB8::default()));
    }

    #[test]
    fn test_map_past_strip_end_dropped() {
        let mut config = LedStripHwConfig::default();
        config.pixel_map[Zone::Bottom.index()] = Some(7);
        let mut strip = LedStripActuator::<3>::new(&config);
        strip.apply_zone(Zone::Bottom, 100);
        assert!(strip.pixels().iter().all(|p| *p == RGB8::default()));
    }
}
