//! Test doubles for the hardware traits

use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use canne_protocol::{Line, Zone, ZONE_COUNT};

use crate::traits::{Actuator, Clock, LineSource, Millis};

/// One call made on the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Apply(Zone, u8),
    ClearAll,
}

/// Actuator that records every call and tracks output levels
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub calls: Vec<Output>,
    levels: [u8; ZONE_COUNT],
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, zone: Zone) -> u8 {
        self.levels[zone.index()]
    }

    pub fn last(&self) -> Option<Output> {
        self.calls.last().copied()
    }

    /// Number of zones currently driven above zero
    pub fn active_zones(&self) -> usize {
        self.levels.iter().filter(|&&l| l > 0).count()
    }
}

impl Actuator for RecordingActuator {
    fn apply_zone(&mut self, zone: Zone, intensity: u8) {
        self.calls.push(Output::Apply(zone, intensity));
        self.levels[zone.index()] = intensity;
    }

    fn clear_all(&mut self) {
        self.calls.push(Output::ClearAll);
        self.levels = [0; ZONE_COUNT];
    }
}

/// Clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Line source fed from a script
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<Line>,
}

impl ScriptedLines {
    pub fn new(lines: &[&str]) -> Self {
        let mut source = Self::default();
        for line in lines {
            source.push(line);
        }
        source
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push_back(Line::try_from(line).unwrap());
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn poll_line(&mut self) -> Option<Line> {
        self.lines.pop_front()
    }
}
