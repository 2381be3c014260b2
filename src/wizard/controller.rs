//! Wizard controller
//!
//! Entry point for every user action in a session. It owns the session's
//! [`WizardState`], forwards step changes to it, runs extractions through the
//! gateway and asks the [`SplitEngine`] for results when the Result step is
//! reached. Every operation either succeeds or leaves the state untouched.
//!
//! The Result step is read-only: edits there are refused so the stored
//! outcome always describes the current bill and participants.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{PatunganError, PatunganResult};
use crate::gateway::{BillExtractionGateway, ExtractionError, ReceiptImage};
use crate::models::{
    BillRecord, ItemEdit, ItemId, LineItem, Money, Participant, SplitMethod, DEFAULT_PARTICIPANT,
};
use crate::services::SplitEngine;

use super::state::WizardState;
use super::step::Step;

/// Drives one bill-splitting session
pub struct WizardController {
    state: WizardState,
    gateway: Arc<dyn BillExtractionGateway>,
    extraction_timeout: Duration,
}

impl WizardController {
    pub fn new(gateway: Arc<dyn BillExtractionGateway>, extraction_timeout: Duration) -> Self {
        Self {
            state: WizardState::new(),
            gateway,
            extraction_timeout,
        }
    }

    /// Controller using the timeout and first participant from `settings`
    pub fn from_settings(gateway: Arc<dyn BillExtractionGateway>, settings: &Settings) -> Self {
        let first = Participant::new(settings.default_participant.as_str())
            .or_else(|_| Participant::new(DEFAULT_PARTICIPANT))
            .unwrap_or_else(|_| unreachable!("default participant name is valid"));
        Self {
            state: WizardState::with_default_participant(first),
            gateway,
            extraction_timeout: settings.request_timeout(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    // --- Upload -----------------------------------------------------------

    /// Extract a bill from `image` and store it, replacing any previous bill
    ///
    /// Only allowed on the Upload step. On failure (including timeout) the
    /// state is unchanged.
    pub async fn extract(&mut self, image: &ReceiptImage) -> PatunganResult<&BillRecord> {
        if self.state.step() != Step::Upload {
            return Err(PatunganError::invalid_transition(
                self.state.step(),
                "receipts can only be submitted on the Upload step",
            ));
        }
        let secs = self.extraction_timeout.as_secs();
        info!(image = image.label(), gateway = self.gateway.name(), "extracting bill");

        let bill = match tokio::time::timeout(self.extraction_timeout, self.gateway.extract(image))
            .await
        {
            Ok(Ok(bill)) => bill,
            Ok(Err(err)) => {
                warn!(error = %err, "extraction failed");
                return Err(err.into());
            }
            Err(_) => {
                warn!(timeout_secs = secs, "extraction timed out");
                return Err(ExtractionError::Timeout(secs).into());
            }
        };

        if let Some(diff) = bill.reported_total_mismatch() {
            warn!(difference = %diff, "receipt total differs from the sum of its parts");
        }
        self.state.set_bill(bill);
        self.state.bill().ok_or_else(PatunganError::no_bill)
    }

    /// Extract a bill and move on to the Edit step
    pub async fn submit_receipt(&mut self, image: &ReceiptImage) -> PatunganResult<Step> {
        self.extract(image).await?;
        self.next()
    }

    // --- Navigation -------------------------------------------------------

    /// Leave the current step for the next one
    ///
    /// Entering the Result step computes the split.
    pub fn next(&mut self) -> PatunganResult<Step> {
        let to = self.state.advance(self.state.step())?;
        if to == Step::Result {
            self.compute_results()?;
        }
        Ok(to)
    }

    /// Return to the previous step
    pub fn back(&mut self) -> PatunganResult<Step> {
        let from = self.state.step();
        let to = self.state.retreat(from)?;
        if from == Step::Result {
            self.state.set_outcome(Default::default());
        }
        Ok(to)
    }

    /// Throw the session away and start again
    pub fn reset(&mut self) {
        self.state.reset();
    }

    fn compute_results(&mut self) -> PatunganResult<()> {
        let bill = self.state.bill().ok_or_else(PatunganError::no_bill)?;
        let method = self.state.split_method().ok_or_else(|| {
            PatunganError::invalid_transition(Step::Split, "choose a split method")
        })?;

        let outcome = SplitEngine::compute(
            bill,
            self.state.participants(),
            method,
            Some(self.state.assignment()),
        );
        if outcome.has_warnings() {
            info!(
                items = outcome.warnings.len(),
                amount = %outcome.unassigned_total(),
                "items left out of the split"
            );
        }
        self.state.set_outcome(outcome);
        Ok(())
    }

    // --- Edit -------------------------------------------------------------

    fn ensure_editable(&self) -> PatunganResult<()> {
        if self.state.step() == Step::Result {
            return Err(PatunganError::invalid_transition(
                Step::Result,
                "go back before changing the bill, people or split",
            ));
        }
        Ok(())
    }

    fn bill_mut(&mut self) -> PatunganResult<&mut BillRecord> {
        self.ensure_editable()?;
        self.state.bill_mut().ok_or_else(PatunganError::no_bill)
    }

    pub fn set_merchant_name(&mut self, name: &str) -> PatunganResult<()> {
        self.bill_mut()?.set_merchant_name(name);
        Ok(())
    }

    /// Append a manually entered item
    ///
    /// The name must not be blank and both quantity and unit price must be
    /// greater than zero.
    pub fn add_item(&mut self, name: &str, quantity: f64, unit_price: Money) -> PatunganResult<ItemId> {
        self.ensure_editable()?;
        if name.trim().is_empty() {
            return Err(PatunganError::Validation("Item name cannot be empty".into()));
        }
        if quantity.is_nan() || quantity <= 0.0 {
            return Err(PatunganError::Validation(
                "Quantity must be greater than zero".into(),
            ));
        }
        if !unit_price.is_positive() {
            return Err(PatunganError::Validation(
                "Unit price must be greater than zero".into(),
            ));
        }

        let item = LineItem::new(name, quantity, unit_price)?;
        let bill = self.bill_mut()?;
        let id = bill.add_item(item);
        info!(item = name.trim(), total = %bill.total_amount(), "item added");
        Ok(id)
    }

    pub fn update_item(&mut self, id: ItemId, edit: &ItemEdit) -> PatunganResult<()> {
        self.ensure_editable()?;
        if edit.is_empty() {
            return Ok(());
        }
        self.bill_mut()?.edit_item(id, edit)?;
        Ok(())
    }

    /// Remove an item together with its payer assignment
    pub fn remove_item(&mut self, id: ItemId) -> PatunganResult<LineItem> {
        let removed = self
            .bill_mut()?
            .remove_item(id)
            .ok_or_else(|| PatunganError::item_not_found(id.to_string()))?;
        self.state.assignment_mut().remove_item(id);
        Ok(removed)
    }

    pub fn set_tax_amount(&mut self, amount: Money) -> PatunganResult<()> {
        self.bill_mut()?.set_tax_amount(amount)?;
        Ok(())
    }

    pub fn set_service_charge(&mut self, amount: Money) -> PatunganResult<()> {
        self.bill_mut()?.set_service_charge(amount)?;
        Ok(())
    }

    // --- Friends ----------------------------------------------------------

    /// Append a participant; duplicate names are allowed
    pub fn add_participant(&mut self, name: &str) -> PatunganResult<()> {
        self.ensure_editable()?;
        let participant = Participant::new(name)?;
        info!(participant = participant.name(), "participant added");
        self.state.participants_mut().push(participant);
        Ok(())
    }

    /// Rename the participant at `index`
    ///
    /// Assignments follow the new name unless another participant still uses
    /// the old one.
    pub fn rename_participant(&mut self, index: usize, name: &str) -> PatunganResult<()> {
        self.ensure_editable()?;
        let renamed = Participant::new(name)?;
        let participants = self.state.participants_mut();
        let slot = participants
            .get_mut(index)
            .ok_or_else(|| PatunganError::participant_not_found(format!("#{}", index + 1)))?;
        let old = std::mem::replace(slot, renamed);

        let new_name = participants[index].name().to_string();
        let still_used = participants.iter().any(|p| p.name() == old.name());
        if !still_used {
            self.state
                .assignment_mut()
                .rename_participant(old.name(), &new_name);
        }
        Ok(())
    }

    /// Remove the participant at `index`
    pub fn remove_participant(&mut self, index: usize) -> PatunganResult<Participant> {
        self.ensure_editable()?;
        let participants = self.state.participants_mut();
        if index >= participants.len() {
            return Err(PatunganError::participant_not_found(format!("#{}", index + 1)));
        }
        let removed = participants.remove(index);

        let still_used = participants.iter().any(|p| p.name() == removed.name());
        if !still_used {
            self.state.assignment_mut().remove_participant(removed.name());
        }
        Ok(removed)
    }

    // --- Split ------------------------------------------------------------

    pub fn choose_split_method(&mut self, method: SplitMethod) -> PatunganResult<()> {
        self.ensure_editable()?;
        self.state.set_split_method(method);
        Ok(())
    }

    /// Flip whether `name` pays for an item; returns the new state
    pub fn toggle_payer(&mut self, item: ItemId, name: &str) -> PatunganResult<bool> {
        self.ensure_editable()?;
        self.ensure_item(item)?;
        self.ensure_participant(name)?;
        Ok(self.state.assignment_mut().toggle(item, name))
    }

    /// Replace the payers of an item
    pub fn set_payers(&mut self, item: ItemId, names: &[&str]) -> PatunganResult<()> {
        self.ensure_editable()?;
        self.ensure_item(item)?;
        for name in names {
            self.ensure_participant(name)?;
        }
        self.state.assignment_mut().set_payers(item, names.iter().copied());
        Ok(())
    }

    /// Items no current participant pays for
    pub fn unassigned_items(&self) -> Vec<&LineItem> {
        let Some(bill) = self.state.bill() else {
            return Vec::new();
        };
        let participants = self.state.participants();
        let assignment = self.state.assignment();
        bill.items()
            .iter()
            .filter(|item| {
                !assignment
                    .payers(item.id())
                    .any(|payer| participants.iter().any(|p| p.name() == payer))
            })
            .collect()
    }

    fn ensure_item(&self, item: ItemId) -> PatunganResult<()> {
        let bill = self.state.bill().ok_or_else(PatunganError::no_bill)?;
        bill.item(item)
            .map(|_| ())
            .ok_or_else(|| PatunganError::item_not_found(item.to_string()))
    }

    fn ensure_participant(&self, name: &str) -> PatunganResult<()> {
        if self.state.participants().iter().any(|p| p.name() == name) {
            Ok(())
        } else {
            Err(PatunganError::participant_not_found(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::image::tests::png_bytes;
    use crate::gateway::{mock_bill, MockGateway};

    fn controller(gateway: MockGateway) -> WizardController {
        WizardController::new(Arc::new(gateway), Duration::from_secs(30))
    }

    fn image() -> ReceiptImage {
        ReceiptImage::from_bytes(png_bytes(), "struk.png").unwrap()
    }

    async fn on_edit_step() -> WizardController {
        let mut wizard = controller(MockGateway::demo());
        wizard.submit_receipt(&image()).await.unwrap();
        wizard
    }

    #[tokio::test]
    async fn test_submit_receipt_advances_to_edit() {
        let wizard = on_edit_step().await;
        assert_eq!(wizard.step(), Step::Edit);
        assert!(wizard.state().is_completed(Step::Upload));
        assert_eq!(
            wizard.state().bill().unwrap().merchant_name(),
            "INDOMARET KAB GARUT"
        );
    }

    #[tokio::test]
    async fn test_failed_extraction_changes_nothing() {
        let mut wizard = controller(MockGateway::failing(ExtractionError::Http {
            status: 500,
            body: "oops".into(),
        }));

        let err = wizard.submit_receipt(&image()).await.unwrap_err();
        assert_eq!(err.to_string(), "API Error: 500 - oops");
        assert_eq!(wizard.step(), Step::Upload);
        assert!(wizard.state().bill().is_none());
        assert!(wizard.next().is_err());
    }

    #[tokio::test]
    async fn test_slow_extraction_times_out() {
        let gateway = MockGateway::demo().with_delay(Duration::from_secs(5));
        let mut wizard = WizardController::new(Arc::new(gateway), Duration::from_millis(50));

        let err = wizard.submit_receipt(&image()).await.unwrap_err();
        assert!(matches!(
            err,
            PatunganError::Extraction(ExtractionError::Timeout(_))
        ));
        assert_eq!(wizard.step(), Step::Upload);
        assert!(wizard.state().bill().is_none());
    }

    #[tokio::test]
    async fn test_submit_only_on_upload_step() {
        let mut wizard = on_edit_step().await;
        assert!(wizard.submit_receipt(&image()).await.unwrap_err().is_invalid_transition());
    }

    #[tokio::test]
    async fn test_add_item_validation() {
        let mut wizard = on_edit_step().await;

        assert!(wizard.add_item(" ", 1.0, Money::new(1000.0)).unwrap_err().is_validation());
        assert!(wizard.add_item("Kerupuk", 0.0, Money::new(1000.0)).is_err());
        assert!(wizard.add_item("Kerupuk", 1.0, Money::zero()).is_err());

        wizard.add_item("Kerupuk", 2.0, Money::new(1000.0)).unwrap();
        let bill = wizard.state().bill().unwrap();
        assert_eq!(bill.items().len(), 2);
        assert_eq!(bill.total_amount(), Money::new(17000.0));
    }

    #[test]
    fn test_edits_need_a_bill() {
        let mut wizard = controller(MockGateway::demo());
        assert!(wizard.add_item("Teh", 1.0, Money::new(1.0)).unwrap_err().is_not_found());
        assert!(wizard.set_tax_amount(Money::new(1.0)).is_err());
    }

    #[tokio::test]
    async fn test_tax_and_service_update_total() {
        let mut wizard = on_edit_step().await;
        wizard.set_tax_amount(Money::new(1500.0)).unwrap();
        wizard.set_service_charge(Money::new(500.0)).unwrap();
        assert!(wizard.set_service_charge(Money::new(-1.0)).unwrap_err().is_validation());

        assert_eq!(wizard.state().bill().unwrap().total_amount(), Money::new(17000.0));
    }

    #[tokio::test]
    async fn test_update_and_remove_item() {
        let mut wizard = on_edit_step().await;
        let id = wizard.state().bill().unwrap().items()[0].id();

        wizard.update_item(id, &ItemEdit::new().quantity(2.0)).unwrap();
        assert_eq!(wizard.state().bill().unwrap().total_amount(), Money::new(6000.0));

        assert!(wizard
            .update_item(id, &ItemEdit::new().name(""))
            .unwrap_err()
            .is_validation());

        wizard.set_payers(id, &["Me"]).unwrap();
        wizard.remove_item(id).unwrap();
        assert!(wizard.state().assignment().is_empty());
        assert!(wizard.remove_item(id).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_participant_changes_follow_assignment() {
        let mut wizard = on_edit_step().await;
        let id = wizard.state().bill().unwrap().items()[0].id();
        wizard.add_participant("Budi").unwrap();
        wizard.set_payers(id, &["Me", "Budi"]).unwrap();

        wizard.rename_participant(1, "Budi Santoso").unwrap();
        assert!(wizard.state().assignment().is_assigned(id, "Budi Santoso"));
        assert!(!wizard.state().assignment().is_assigned(id, "Budi"));

        wizard.remove_participant(0).unwrap();
        let payers: Vec<&str> = wizard.state().assignment().payers(id).collect();
        assert_eq!(payers, vec!["Budi Santoso"]);

        assert!(wizard.remove_participant(5).unwrap_err().is_not_found());
        assert!(wizard.add_participant("  ").unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_removing_one_of_two_namesakes_keeps_assignment() {
        let mut wizard = on_edit_step().await;
        let id = wizard.state().bill().unwrap().items()[0].id();
        wizard.add_participant("Me").unwrap();
        wizard.set_payers(id, &["Me"]).unwrap();

        wizard.remove_participant(1).unwrap();
        assert!(wizard.state().assignment().is_assigned(id, "Me"));
    }

    #[tokio::test]
    async fn test_toggle_payer_checks_inputs() {
        let mut wizard = on_edit_step().await;
        let id = wizard.state().bill().unwrap().items()[0].id();

        assert!(wizard.toggle_payer(id, "Me").unwrap());
        assert!(!wizard.toggle_payer(id, "Me").unwrap());
        assert!(wizard.toggle_payer(id, "Ghost").unwrap_err().is_not_found());
        assert!(wizard.toggle_payer(ItemId::new(), "Me").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unassigned_items() {
        let mut wizard = on_edit_step().await;
        let teh = wizard.state().bill().unwrap().items()[0].id();
        let snack = wizard.add_item("Snack", 1.0, Money::new(5000.0)).unwrap();
        wizard.set_payers(teh, &["Me"]).unwrap();

        let unassigned: Vec<ItemId> = wizard.unassigned_items().iter().map(|i| i.id()).collect();
        assert_eq!(unassigned, vec![snack]);
    }

    #[tokio::test]
    async fn test_entering_result_computes_split() {
        let mut wizard = on_edit_step().await;
        wizard.next().unwrap();
        wizard.add_participant("Budi").unwrap();
        wizard.next().unwrap();
        wizard.choose_split_method(SplitMethod::Even).unwrap();

        assert_eq!(wizard.next().unwrap(), Step::Result);
        let results = &wizard.state().outcome().results;
        assert_eq!(results.get("Me"), Some(Money::new(7500.0)));
        assert_eq!(results.get("Budi"), Some(Money::new(7500.0)));

        wizard.back().unwrap();
        assert!(wizard.state().outcome().results.is_empty());
    }

    #[tokio::test]
    async fn test_result_step_is_read_only() {
        let mut wizard = on_edit_step().await;
        let id = wizard.state().bill().unwrap().items()[0].id();
        wizard.next().unwrap();
        wizard.add_participant("Budi").unwrap();
        wizard.next().unwrap();
        wizard.choose_split_method(SplitMethod::Even).unwrap();
        wizard.next().unwrap();

        assert!(wizard
            .add_item("Snack", 1.0, Money::new(5000.0))
            .unwrap_err()
            .is_invalid_transition());
        assert!(wizard.remove_participant(1).unwrap_err().is_invalid_transition());
        assert!(wizard.add_participant("Citra").is_err());
        assert!(wizard.set_tax_amount(Money::new(100.0)).is_err());
        assert!(wizard.remove_item(id).is_err());
        assert!(wizard.toggle_payer(id, "Me").is_err());
        assert!(wizard.choose_split_method(SplitMethod::PerItem).is_err());
        assert!(wizard.extract(&image()).await.unwrap_err().is_invalid_transition());

        let state = wizard.state();
        assert_eq!(state.participants().len(), 2);
        assert_eq!(state.bill().unwrap().total_amount(), Money::new(15000.0));
        assert_eq!(state.split_method(), Some(SplitMethod::Even));
        assert_eq!(state.outcome().results.get("Budi"), Some(Money::new(7500.0)));

        // Editable again after going back, and the split is recomputed
        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.remove_participant(1).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.state().outcome().results.len(), 1);
        assert_eq!(wizard.state().outcome().results.get("Me"), Some(Money::new(15000.0)));
    }

    #[tokio::test]
    async fn test_extract_only_on_upload_step() {
        let mut wizard = on_edit_step().await;
        let before = wizard.state().bill().unwrap().clone();
        assert!(wizard.extract(&image()).await.unwrap_err().is_invalid_transition());
        assert_eq!(wizard.state().bill(), Some(&before));
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let mut wizard = on_edit_step().await;
        wizard.add_participant("Budi").unwrap();
        wizard.reset();

        assert_eq!(wizard.step(), Step::Upload);
        assert!(wizard.state().bill().is_none());
        assert_eq!(wizard.state().participants().len(), 1);
    }

    #[test]
    fn test_from_settings_uses_default_participant() {
        let settings = Settings {
            default_participant: "Aku".into(),
            ..Settings::default()
        };
        let gateway = Arc::new(MockGateway::succeeding(mock_bill()));
        let mut wizard = WizardController::from_settings(gateway, &settings);
        assert_eq!(wizard.state().participants()[0].name(), "Aku");

        wizard.reset();
        assert_eq!(wizard.state().participants()[0].name(), "Aku");
    }
}
