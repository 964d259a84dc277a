//! Culprit: find the unit behind a problem by adaptive bisection.
//!
//! A set of independently toggleable units (browser extensions, editor
//! plugins, feature flags) is halved round by round while someone reports
//! whether the problem still reproduces. [`isolator`] holds the pure state
//! machine, [`activator`] the capability that actually flips units, and
//! [`session`] ties the two together.

pub use crate::activator::{Activator, Effect, ManifestActivator, MemoryActivator};
pub use crate::candidate::{Candidate, CandidateState};
pub use crate::errors::{CulpritError, Result};
pub use crate::isolator::{Status, Transition};
pub use crate::model::{InvariantViolation, Model};
pub use crate::session::Session;
pub use crate::verdict::Verdict;

pub mod activator;
pub mod candidate;
pub mod cli;
pub mod config;
pub mod errors;
pub mod isolator;
pub mod model;
pub mod repl;
pub mod session;
pub mod verdict;
