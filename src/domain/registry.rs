//! Per-instrument record of emitted entries, used to suppress duplicate entries
//! across cycles.
//!
//! The registry only knows what this process emitted. It does not observe fills
//! or closes; an entry stops blocking once it is older than the cooldown.

use crate::domain::order::Side;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub side: Side,
    pub cycle: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    entries: HashMap<String, RegistryEntry>,
    cooldown_cycles: u64,
}

impl PositionRegistry {
    /// `cooldown_cycles == 0` disables blocking: every cycle may enter again.
    pub fn new(cooldown_cycles: u64) -> Self {
        Self {
            entries: HashMap::new(),
            cooldown_cycles,
        }
    }

    pub fn cooldown_cycles(&self) -> u64 {
        self.cooldown_cycles
    }

    /// The entry blocking `instrument` at `cycle`, if any.
    pub fn blocking_entry(&self, instrument: &str, cycle: u64) -> Option<RegistryEntry> {
        if self.cooldown_cycles == 0 {
            return None;
        }
        self.get(instrument)
            .copied()
            .filter(|e| cycle.saturating_sub(e.cycle) < self.cooldown_cycles)
    }

    pub fn record(&mut self, instrument: &str, side: Side, cycle: u64) {
        self.entries
            .insert(instrument.to_string(), RegistryEntry { side, cycle });
    }

    pub fn get(&self, instrument: &str) -> Option<&RegistryEntry> {
        self.entries.get(instrument)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
