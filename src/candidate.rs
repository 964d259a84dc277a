//! Identifiers for the toggleable units under investigation.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// An opaque, stable identifier for one toggleable unit.
///
/// Candidates are compared by name only. Two units reported with the same
/// name are treated as the same unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Candidate {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Candidate {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A candidate together with its activation state, as reported by an activator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateState {
    pub id: Candidate,
    pub active: bool,
}

impl CandidateState {
    pub fn new(id: impl Into<Candidate>, active: bool) -> Self {
        Self {
            id: id.into(),
            active,
        }
    }
}
