//! An activator that keeps unit state in memory.

use crate::activator::Activator;
use crate::candidate::{Candidate, CandidateState};

/// Holds units in presentation order and records every toggle it performs.
#[derive(Debug, Clone, Default)]
pub struct MemoryActivator {
    units: Vec<CandidateState>,
    toggles: usize,
}

impl MemoryActivator {
    pub fn new(units: Vec<CandidateState>) -> Self {
        Self { units, toggles: 0 }
    }

    /// Builds an activator from `(name, active)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, active)| CandidateState::new(name, active))
                .collect(),
        )
    }

    /// Names of the units that are currently on.
    pub fn active(&self) -> Vec<Candidate> {
        self.units
            .iter()
            .filter(|unit| unit.active)
            .map(|unit| unit.id.clone())
            .collect()
    }

    pub fn is_active(&self, id: &Candidate) -> bool {
        self.units.iter().any(|unit| &unit.id == id && unit.active)
    }

    /// How many actual state changes have been made. Idempotent no-ops are
    /// not counted.
    pub fn toggles(&self) -> usize {
        self.toggles
    }

    fn set(&mut self, id: &Candidate, active: bool) {
        for unit in self.units.iter_mut() {
            if &unit.id == id && unit.active != active {
                unit.active = active;
                self.toggles += 1;
            }
        }
    }
}

impl Activator for MemoryActivator {
    fn list_candidates(&self) -> Vec<CandidateState> {
        self.units.clone()
    }

    fn activate(&mut self, id: &Candidate) {
        self.set(id, true);
    }

    fn deactivate(&mut self, id: &Candidate) {
        self.set(id, false);
    }
}
