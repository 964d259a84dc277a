//! The capability that discovers units and switches them on and off.
//!
//! The isolation core never talks to an activator. It hands back
//! [`Effect`]s, and [`crate::session::Session`] feeds them through
//! [`apply`]. Anything that can enumerate named units and toggle them by
//! name can serve as a backend.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::{Candidate, CandidateState};
use crate::errors::Result;

pub mod manifest;
pub mod memory;

pub use manifest::{Manifest, ManifestActivator, ManifestFormat, UnitEntry};
pub use memory::MemoryActivator;

/// One activation change requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Activate(Candidate),
    Deactivate(Candidate),
}

impl Effect {
    pub fn candidate(&self) -> &Candidate {
        match self {
            Effect::Activate(id) | Effect::Deactivate(id) => id,
        }
    }
}

pub trait Activator {
    /// Known units and their current state, in a stable presentation order.
    fn list_candidates(&self) -> Vec<CandidateState>;

    /// Switches a unit on. Does nothing if it is already on or unknown.
    fn activate(&mut self, id: &Candidate);

    /// Switches a unit off. Does nothing if it is already off or unknown.
    fn deactivate(&mut self, id: &Candidate);

    /// Makes every change issued so far durable. Backends that act
    /// immediately need not override this.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Carries out `effects` in order, then flushes.
pub fn apply<A: Activator + ?Sized>(activator: &mut A, effects: &[Effect]) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::Activate(id) => {
                debug!(unit = %id, "enabling");
                activator.activate(id);
            }
            Effect::Deactivate(id) => {
                debug!(unit = %id, "disabling");
                activator.deactivate(id);
            }
        }
    }
    activator.flush()
}
