//! Drives the isolation core against a real activator.
//!
//! A [`Session`] owns its activator. Each call runs one pure transition from
//! [`crate::isolator`], applies the resulting effects in order, and flushes
//! before returning, so the caller only ever sees a model whose activation
//! state is already in place. The model itself stays with the caller.

use tracing::info;

use crate::activator::{self, Activator, Effect};
use crate::candidate::Candidate;
use crate::errors::Result;
use crate::isolator::{self, Status, Transition};
use crate::model::Model;
use crate::verdict::Verdict;

pub struct Session<A> {
    activator: A,
}

impl<A: Activator> Session<A> {
    pub fn new(activator: A) -> Self {
        Self { activator }
    }

    pub fn activator(&self) -> &A {
        &self.activator
    }

    /// Snapshots the units and opens round one.
    pub fn start(&mut self) -> Result<Transition> {
        let snapshot = self.activator.list_candidates();
        let transition = isolator::start(&snapshot);
        info!(
            enabled = transition.model.originally_enabled.len(),
            disabled = transition.model.originally_disabled.len(),
            "starting isolation"
        );
        self.commit(transition)
    }

    pub fn report_pass(&mut self, model: &Model) -> Result<Transition> {
        let transition = isolator::report_pass(model);
        self.commit(transition)
    }

    pub fn report_fail(&mut self, model: &Model) -> Result<Transition> {
        let transition = isolator::report_fail(model);
        if !transition.status.is_terminal() {
            let tabled = join(transition.effects.iter().map(Effect::candidate));
            info!(units = %tabled, "tabling for now");
        }
        self.commit(transition)
    }

    pub fn report(&mut self, model: &Model, verdict: Verdict) -> Result<Transition> {
        match verdict {
            Verdict::Pass => self.report_pass(model),
            Verdict::Fail => self.report_fail(model),
        }
    }

    /// Switches every known unit on.
    pub fn fully_enable(&mut self) -> Result<()> {
        let effects = isolator::enable_all(&self.activator.list_candidates());
        info!(units = effects.len(), "enabling everything");
        activator::apply(&mut self.activator, &effects)
    }

    /// Switches every known unit off.
    pub fn fully_disable(&mut self) -> Result<()> {
        let effects = isolator::disable_all(&self.activator.list_candidates());
        info!(units = effects.len(), "disabling everything");
        activator::apply(&mut self.activator, &effects)
    }

    /// Returns every unit `model` knows about to its state at `start`.
    pub fn restore(&mut self, model: &Model) -> Result<()> {
        let effects = isolator::restore(model, &self.activator.list_candidates());
        info!(changes = effects.len(), "restoring original state");
        activator::apply(&mut self.activator, &effects)
    }

    /// Brings the units back in line with `model`.
    pub fn realign(&mut self, model: &Model) -> Result<()> {
        let effects = isolator::realign(model, &self.activator.list_candidates());
        activator::apply(&mut self.activator, &effects)
    }

    fn commit(&mut self, transition: Transition) -> Result<Transition> {
        activator::apply(&mut self.activator, &transition.effects)?;
        match &transition.status {
            Status::Testing { round } => info!(
                round,
                testing = %join(transition.model.to_test.iter()),
                remaining = transition.model.remaining(),
                "round ready"
            ),
            Status::AllClear => info!("every unit passed; nothing isolated"),
            Status::Isolated(culprit) => info!(%culprit, "culprit isolated"),
            Status::Inconclusive => info!("symptom reproduced with nothing under test"),
        }
        Ok(transition)
    }
}

fn join<'a>(ids: impl Iterator<Item = &'a Candidate>) -> String {
    ids.map(Candidate::as_str).collect::<Vec<_>>().join(", ")
}
