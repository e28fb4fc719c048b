//! Actuator zones and their wire codes

/// Length of a zone code on the wire
pub const ZONE_CODE_LEN: usize = 3;

/// Number of distinct zones
pub const ZONE_COUNT: usize = 4;

/// A named actuator location on the cane handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    /// Forward / up (`UPP`)
    Up,
    /// Left side (`GAU`, gauche)
    Left,
    /// Right side (`DRO`, droite)
    Right,
    /// Bottom (`BOT`)
    Bottom,
}

// Wire format codes
const CODE_UP: [u8; ZONE_CODE_LEN] = *b"UPP";
const CODE_LEFT: [u8; ZONE_CODE_LEN] = *b"GAU";
const CODE_RIGHT: [u8; ZONE_CODE_LEN] = *b"DRO";
const CODE_BOTTOM: [u8; ZONE_CODE_LEN] = *b"BOT";

impl Zone {
    /// All zones, in output index order
    pub const ALL: [Zone; ZONE_COUNT] = [Zone::Up, Zone::Left, Zone::Right, Zone::Bottom];

    /// Parse a zone from its wire code
    pub fn from_code(code: [u8; ZONE_CODE_LEN]) -> Option<Self> {
        match code {
            CODE_UP => Some(Zone::Up),
            CODE_LEFT => Some(Zone::Left),
            CODE_RIGHT => Some(Zone::Right),
            CODE_BOTTOM => Some(Zone::Bottom),
            _ => None,
        }
    }

    /// Wire code for this zone
    pub fn code(self) -> &'static str {
        match self {
            Zone::Up => "UPP",
            Zone::Left => "GAU",
            Zone::Right => "DRO",
            Zone::Bottom => "BOT",
        }
    }

    /// Index of this zone in per-zone arrays
    pub fn index(self) -> usize {
        match self {
            Zone::Up => 0,
            Zone::Left => 1,
            Zone::Right => 2,
            Zone::Bottom => 3,
        }
    }
}

/// Set of zones fitted on a given deployment
///
/// Three-zone canes have no bottom actuator; commands for a zone that is not
/// fitted are treated like unknown zone codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneSet(u8);

impl ZoneSet {
    /// No zones
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All four zones
    pub const fn all() -> Self {
        Self(0b1111)
    }

    /// Up, left and right (no bottom actuator)
    pub const fn three_zone() -> Self {
        Self(0b0111)
    }

    /// Add a zone to the set
    pub fn insert(&mut self, zone: Zone) {
        self.0 |= 1 << zone.index();
    }

    /// Check whether a zone is in the set
    pub fn contains(&self, zone: Zone) -> bool {
        self.0 & (1 << zone.index()) != 0
    }

    /// Number of zones in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ZoneSet {
    fn default() -> Self {
        Self::all()
    }
}
