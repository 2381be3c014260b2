//! Wizard state machine
//!
//! `WizardState` holds everything one bill-splitting session knows: the current
//! step, which steps have been completed, the bill, the participants, the split
//! choice and the last computed outcome.
//!
//! Step changes go through [`WizardState::advance`] and [`WizardState::retreat`]
//! only. Advancing always re-validates the step being left, and retreating
//! un-marks the step being returned to, so `completed_steps` is always exactly
//! the steps before the current one.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::{PatunganError, PatunganResult};
use crate::models::{
    BillRecord, ItemAssignment, Participant, SplitMethod, SplitOutcome, DEFAULT_PARTICIPANT,
};

use super::step::Step;

/// State of one bill-splitting session
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    step: Step,
    completed_steps: BTreeSet<Step>,
    default_participant: Participant,
    bill: Option<BillRecord>,
    participants: Vec<Participant>,
    split_method: Option<SplitMethod>,
    assignment: ItemAssignment,
    outcome: SplitOutcome,
}

impl WizardState {
    /// Fresh session whose participant list starts with "Me"
    pub fn new() -> Self {
        let me = Participant::new(DEFAULT_PARTICIPANT)
            .unwrap_or_else(|_| unreachable!("default participant name is valid"));
        Self::with_default_participant(me)
    }

    /// Fresh session whose participant list starts with `participant`
    pub fn with_default_participant(participant: Participant) -> Self {
        Self {
            step: Step::Upload,
            completed_steps: BTreeSet::new(),
            participants: vec![participant.clone()],
            default_participant: participant,
            bill: None,
            split_method: None,
            assignment: ItemAssignment::new(),
            outcome: SplitOutcome::default(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn completed_steps(&self) -> &BTreeSet<Step> {
        &self.completed_steps
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn bill(&self) -> Option<&BillRecord> {
        self.bill.as_ref()
    }

    pub fn bill_mut(&mut self) -> Option<&mut BillRecord> {
        self.bill.as_mut()
    }

    /// Replace the bill (after an extraction)
    ///
    /// Payer assignments refer to the old bill's items, so they are dropped.
    pub fn set_bill(&mut self, bill: BillRecord) {
        self.bill = Some(bill);
        self.assignment.clear();
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participants_mut(&mut self) -> &mut Vec<Participant> {
        &mut self.participants
    }

    pub fn split_method(&self) -> Option<SplitMethod> {
        self.split_method
    }

    pub fn set_split_method(&mut self, method: SplitMethod) {
        self.split_method = Some(method);
    }

    pub fn assignment(&self) -> &ItemAssignment {
        &self.assignment
    }

    pub fn assignment_mut(&mut self) -> &mut ItemAssignment {
        &mut self.assignment
    }

    /// Last computed split, empty until the Split step has been left
    pub fn outcome(&self) -> &SplitOutcome {
        &self.outcome
    }

    pub fn set_outcome(&mut self, outcome: SplitOutcome) {
        self.outcome = outcome;
    }

    /// Check the exit condition of `step`
    ///
    /// Returns the reason the step cannot be left, if any.
    pub fn exit_blocker(&self, step: Step) -> Option<&'static str> {
        match step {
            Step::Upload | Step::Edit if self.bill.is_none() => {
                Some("no receipt has been extracted yet")
            }
            Step::Upload | Step::Edit => None,
            Step::Friends if self.participants.is_empty() => {
                Some("add at least one participant")
            }
            Step::Friends => None,
            Step::Split if self.split_method.is_none() => Some("choose a split method"),
            Step::Split => None,
            Step::Result => Some("this is the last step"),
        }
    }

    /// Leave `from` for the next step
    ///
    /// `from` must be the current step and its exit condition must hold.
    pub fn advance(&mut self, from: Step) -> PatunganResult<Step> {
        self.ensure_current(from)?;
        if let Some(reason) = self.exit_blocker(from) {
            return Err(PatunganError::invalid_transition(from, reason));
        }
        let to = from
            .next()
            .ok_or_else(|| PatunganError::invalid_transition(from, "this is the last step"))?;

        if from == Step::Edit && self.bill.as_ref().is_some_and(|b| b.items().is_empty()) {
            info!("continuing with a bill that has no items");
        }

        self.completed_steps.insert(from);
        self.step = to;
        info!(from = %from, to = %to, "wizard advanced");
        Ok(to)
    }

    /// Go back from `from` to the previous step
    ///
    /// The previous step loses its completion mark and must be validated again
    /// on the way forward.
    pub fn retreat(&mut self, from: Step) -> PatunganResult<Step> {
        self.ensure_current(from)?;
        let to = from
            .prev()
            .ok_or_else(|| PatunganError::invalid_transition(from, "this is the first step"))?;
        if !self.completed_steps.remove(&to) {
            return Err(PatunganError::invalid_transition(
                from,
                format!("step {} was never completed", to),
            ));
        }

        self.step = to;
        info!(from = %from, to = %to, "wizard went back");
        Ok(to)
    }

    /// Discard the session and start over at the Upload step
    pub fn reset(&mut self) {
        *self = Self::with_default_participant(self.default_participant.clone());
        info!("wizard reset");
    }

    fn ensure_current(&self, from: Step) -> PatunganResult<()> {
        if from != self.step {
            return Err(PatunganError::invalid_transition(
                from,
                format!("the wizard is at step {}", self.step),
            ));
        }
        Ok(())
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
