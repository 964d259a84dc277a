//! The bisection state machine.
//!
//! Every function in this module is pure: it takes a [`Model`] (or a snapshot
//! of the units as an activator reports them) and returns the next model
//! together with the [`Effect`]s the caller must carry out. Nothing here
//! touches an activator directly; see [`crate::session`] for the driver that
//! does.
//!
//! A failing round bisects `to_test` and parks the removed half in
//! `under_suspicion`. A passing round clears `to_test` into `passed` and then
//! schedules the next round, giving parked suspects priority over the
//! untested backlog. This lets the search pin down a unit that only
//! misbehaves in combination with another one.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::activator::Effect;
use crate::candidate::{Candidate, CandidateState};
use crate::model::Model;

// ============================================================================
// TRANSITION RESULTS
// ============================================================================

/// Where a session stands after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// A round is live and waiting for a verdict.
    Testing { round: usize },
    /// Every candidate went through a passing round. Nothing was isolated.
    AllClear,
    /// The symptom was narrowed down to this single candidate.
    Isolated(Candidate),
    /// The symptom reproduced with no candidate under test.
    Inconclusive,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Testing { .. })
    }
}

/// The outcome of one transition: the next model, the activation changes
/// that realize it, and the resulting status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub model: Model,
    pub effects: Vec<Effect>,
    pub status: Status,
}

impl Transition {
    fn testing(model: Model, effects: Vec<Effect>) -> Self {
        let status = Status::Testing { round: model.round };
        Self {
            model,
            effects,
            status,
        }
    }

    fn terminal(model: Model, status: Status) -> Self {
        Self {
            model,
            effects: Vec::new(),
            status,
        }
    }
}

// ============================================================================
// HALVING RULE
// ============================================================================

/// Splits `names` into a prefix of `⌈n/2⌉` and a suffix of `⌊n/2⌋`.
///
/// The extra element of an odd-length input stays in the first half, which
/// is the half that remains active.
pub fn split(names: &Vector<Candidate>) -> (Vector<Candidate>, Vector<Candidate>) {
    let mid = names.len().div_ceil(2);
    names.clone().split_at(mid)
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Opens a session from the units' current activation state.
///
/// The originally active units are halved; the first half stays on as round
/// one and the second half is switched off and queued.
pub fn start(snapshot: &[CandidateState]) -> Transition {
    let originally_enabled: Vector<Candidate> = snapshot
        .iter()
        .filter(|unit| unit.active)
        .map(|unit| unit.id.clone())
        .collect();
    let originally_disabled: Vector<Candidate> = snapshot
        .iter()
        .filter(|unit| !unit.active)
        .map(|unit| unit.id.clone())
        .collect();

    let (next_up, later) = split(&originally_enabled);
    let effects = deactivate_all(&later);

    let model = Model {
        originally_enabled,
        originally_disabled,
        untested: later,
        to_test: next_up,
        passed: Vector::new(),
        under_suspicion: Vector::new(),
        round: 1,
    };
    debug_check(&model, "start");
    Transition::testing(model, effects)
}

/// The symptom did not reproduce with the current active set.
pub fn report_pass(model: &Model) -> Transition {
    debug_check(model, "report_pass (entry)");

    if model.untested.is_empty() && model.under_suspicion.is_empty() {
        return Transition::terminal(model.clone(), Status::AllClear);
    }

    let mut done = model.passed.clone();
    done.append(model.to_test.clone());

    let next = if !model.under_suspicion.is_empty() {
        Transition::testing(
            Model {
                to_test: model.under_suspicion.clone(),
                passed: done,
                under_suspicion: Vector::new(),
                round: model.round + 1,
                ..model.clone()
            },
            activate_all(&model.under_suspicion),
        )
    } else {
        let (next_up, later) = split(&model.untested);
        let effects = activate_all(&next_up);
        Transition::testing(
            Model {
                untested: later,
                to_test: next_up,
                passed: done,
                round: model.round + 1,
                ..model.clone()
            },
            effects,
        )
    };
    debug_check(&next.model, "report_pass (exit)");
    next
}

/// The symptom reproduced with the current active set.
pub fn report_fail(model: &Model) -> Transition {
    debug_check(model, "report_fail (entry)");

    if model.to_test.len() == 1 {
        let culprit = model.to_test[0].clone();
        return Transition::terminal(model.clone(), Status::Isolated(culprit));
    }
    if model.to_test.is_empty() {
        return Transition::terminal(model.clone(), Status::Inconclusive);
    }

    let (next_up, later) = split(&model.to_test);
    let effects = deactivate_all(&later);
    let mut under_suspicion = model.under_suspicion.clone();
    under_suspicion.append(later);

    let next = Transition::testing(
        Model {
            to_test: next_up,
            under_suspicion,
            round: model.round + 1,
            ..model.clone()
        },
        effects,
    );
    debug_check(&next.model, "report_fail (exit)");
    next
}

// ============================================================================
// BULK UTILITIES
// ============================================================================

/// Switches on every known unit, independent of any session.
pub fn enable_all(snapshot: &[CandidateState]) -> Vec<Effect> {
    snapshot
        .iter()
        .map(|unit| Effect::Activate(unit.id.clone()))
        .collect()
}

/// Switches off every known unit, independent of any session.
pub fn disable_all(snapshot: &[CandidateState]) -> Vec<Effect> {
    snapshot
        .iter()
        .map(|unit| Effect::Deactivate(unit.id.clone()))
        .collect()
}

/// Puts every unit the session knows about back the way it was at `start`.
///
/// Originally enabled units are switched back on first, then stragglers that
/// were originally disabled are switched off. Units the model has never seen
/// are left alone.
pub fn restore(model: &Model, snapshot: &[CandidateState]) -> Vec<Effect> {
    let mut effects: Vec<Effect> = model
        .originally_enabled
        .iter()
        .filter(|id| is_active(snapshot, id) == Some(false))
        .map(|id| Effect::Activate(id.clone()))
        .collect();
    effects.extend(
        model
            .originally_disabled
            .iter()
            .filter(|id| is_active(snapshot, id) == Some(true))
            .map(|id| Effect::Deactivate(id.clone())),
    );
    effects
}

/// The changes needed for the units to match `model` again, e.g. after
/// stepping back to an earlier snapshot.
pub fn realign(model: &Model, snapshot: &[CandidateState]) -> Vec<Effect> {
    let mut effects: Vec<Effect> = model
        .inactive_set()
        .iter()
        .filter(|id| is_active(snapshot, id) == Some(true))
        .map(|id| Effect::Deactivate(id.clone()))
        .collect();
    effects.extend(
        model
            .active_set()
            .iter()
            .filter(|id| is_active(snapshot, id) == Some(false))
            .map(|id| Effect::Activate(id.clone())),
    );
    effects
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn activate_all(ids: &Vector<Candidate>) -> Vec<Effect> {
    ids.iter().cloned().map(Effect::Activate).collect()
}

fn deactivate_all(ids: &Vector<Candidate>) -> Vec<Effect> {
    ids.iter().cloned().map(Effect::Deactivate).collect()
}

fn is_active(snapshot: &[CandidateState], id: &Candidate) -> Option<bool> {
    snapshot
        .iter()
        .find(|unit| &unit.id == id)
        .map(|unit| unit.active)
}

/// Panics on a malformed model in debug builds. A broken partition can only
/// come from a caller editing the model by hand.
fn debug_check(model: &Model, during: &str) {
    if cfg!(debug_assertions) {
        if let Err(violation) = model.check_invariants() {
            panic!("malformed isolation model during {during}: {violation}");
        }
    }
}
