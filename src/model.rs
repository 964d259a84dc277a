//! The isolation session record.
//!
//! A [`Model`] is an immutable snapshot. Every transition in
//! [`crate::isolator`] consumes one and builds the next; nothing here is ever
//! mutated in place once handed to the caller. The four working pools are
//! persistent vectors, so building the next snapshot shares structure with
//! the previous one instead of copying it.

use std::collections::HashMap;

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidate::Candidate;

// ============================================================================
// MODEL: the session snapshot threaded through every transition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Candidates active when the session began, in presentation order.
    pub originally_enabled: Vector<Candidate>,
    /// Candidates inactive when the session began. Never touched by the
    /// isolation rounds.
    pub originally_disabled: Vector<Candidate>,
    /// Not yet vetted; inactive; queued for a future round.
    pub untested: Vector<Candidate>,
    /// Active and under test in the current round.
    pub to_test: Vector<Candidate>,
    /// Cleared by a passing round; kept active.
    pub passed: Vector<Candidate>,
    /// Parked by a failing round; inactive until a dedicated round.
    pub under_suspicion: Vector<Candidate>,
    /// One-based number of the round this snapshot is waiting on.
    pub round: usize,
}

impl Model {
    /// Candidates the activator should currently have switched on.
    pub fn active_set(&self) -> Vector<Candidate> {
        let mut active = self.passed.clone();
        active.append(self.to_test.clone());
        active
    }

    /// Candidates the activator should currently have switched off.
    pub fn inactive_set(&self) -> Vector<Candidate> {
        let mut inactive = self.untested.clone();
        inactive.append(self.under_suspicion.clone());
        inactive.append(self.originally_disabled.clone());
        inactive
    }

    /// Number of candidates that still have to go through a round, counting
    /// the one in progress.
    pub fn remaining(&self) -> usize {
        self.untested.len() + self.to_test.len() + self.under_suspicion.len()
    }

    /// Verifies that `untested`, `to_test`, `passed` and `under_suspicion`
    /// partition `originally_enabled` exactly.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        // Maps each original to whether a pool has claimed it yet.
        let mut originals: HashMap<&Candidate, bool> = HashMap::new();
        for id in &self.originally_enabled {
            if originals.insert(id, false).is_some() {
                return Err(InvariantViolation::DuplicateOriginal(id.clone()));
            }
        }
        for id in &self.originally_disabled {
            if originals.contains_key(id) {
                return Err(InvariantViolation::EnabledAndDisabled(id.clone()));
            }
        }

        let pools = [
            &self.untested,
            &self.to_test,
            &self.passed,
            &self.under_suspicion,
        ];
        for pool in pools {
            for id in pool {
                match originals.get_mut(id) {
                    None => return Err(InvariantViolation::Unknown(id.clone())),
                    Some(placed) if *placed => {
                        return Err(InvariantViolation::Duplicate(id.clone()))
                    }
                    Some(placed) => *placed = true,
                }
            }
        }

        match self
            .originally_enabled
            .iter()
            .find(|id| originals.get(id) == Some(&false))
        {
            Some(missing) => Err(InvariantViolation::Missing(missing.clone())),
            None => Ok(()),
        }
    }
}

/// A way in which a [`Model`] fails to partition its original candidates.
///
/// Only a hand-edited model can produce one of these; every transition
/// preserves the partition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("candidate '{0}' appears more than once in the originally enabled list")]
    DuplicateOriginal(Candidate),
    #[error("candidate '{0}' is listed as both originally enabled and originally disabled")]
    EnabledAndDisabled(Candidate),
    #[error("candidate '{0}' is placed in more than one pool")]
    Duplicate(Candidate),
    #[error("candidate '{0}' was originally enabled but is in no pool")]
    Missing(Candidate),
    #[error("candidate '{0}' is in a pool but was never originally enabled")]
    Unknown(Candidate),
}
