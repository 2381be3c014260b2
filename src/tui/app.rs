//! Application state for the TUI
//!
//! The App struct holds the wizard session plus everything that only exists
//! on screen: selections, open dialog, text inputs and notifications.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::PatunganError;
use crate::gateway::ReceiptImage;
use crate::models::{ItemId, LineItem};
use crate::wizard::{Step, WizardController};

use super::dialogs::item::ItemFormState;
use super::dialogs::prompt::{PromptPurpose, PromptState};
use super::widgets::{Notification, NotificationQueue, TextInput};

/// Which dialog is currently open
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    ItemForm,
    Prompt,
    Confirm(ConfirmAction),
}

/// An action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Throw the session away
    Reset,
    RemoveItem { id: ItemId, name: String },
    RemoveParticipant { index: usize, name: String },
}

impl ConfirmAction {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Reset => "Start over",
            Self::RemoveItem { .. } => "Remove item",
            Self::RemoveParticipant { .. } => "Remove participant",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Reset => "Start over with a new receipt?".to_string(),
            Self::RemoveItem { name, .. } => format!("Remove item '{}'?", name),
            Self::RemoveParticipant { name, .. } => format!("Remove {} from the split?", name),
        }
    }
}

/// Main application state
pub struct App<'a> {
    pub controller: WizardController,
    pub settings: &'a Settings,
    pub should_quit: bool,
    pub active_dialog: ActiveDialog,
    pub notifications: NotificationQueue,

    /// An extraction is running; input is ignored until it ends
    pub busy: bool,
    /// Receipt waiting to be extracted by the main loop
    pub pending_extraction: Option<PathBuf>,

    /// Receipt path on the Upload step
    pub image_input: TextInput,
    /// Highlighted row on the Edit and Split steps
    pub selected_item: usize,
    /// Highlighted participant on the Friends step, payer column on Split
    pub selected_participant: usize,

    pub item_form: ItemFormState,
    pub prompt: PromptState,
}

impl<'a> App<'a> {
    pub fn new(controller: WizardController, settings: &'a Settings) -> Self {
        Self {
            controller,
            settings,
            should_quit: false,
            active_dialog: ActiveDialog::None,
            notifications: NotificationQueue::new(),
            busy: false,
            pending_extraction: None,
            image_input: receipt_input(),
            selected_item: 0,
            selected_participant: 0,
            item_form: ItemFormState::new(),
            prompt: PromptState::new(PromptPurpose::AddParticipant),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn step(&self) -> Step {
        self.controller.step()
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency_symbol
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notify_error(&mut self, err: &PatunganError) {
        self.notify(Notification::error(err.to_string()));
    }

    // --- Selection --------------------------------------------------------

    pub fn items(&self) -> &[LineItem] {
        self.controller
            .state()
            .bill()
            .map(|bill| bill.items())
            .unwrap_or(&[])
    }

    pub fn selected_line_item(&self) -> Option<&LineItem> {
        self.items().get(self.selected_item)
    }

    pub fn participant_count(&self) -> usize {
        self.controller.state().participants().len()
    }

    /// Move the row selection of the current step by `delta`
    pub fn move_selection(&mut self, delta: isize) {
        match self.step() {
            Step::Edit | Step::Split => {
                self.selected_item = step_index(self.selected_item, delta, self.items().len());
            }
            Step::Friends => {
                self.selected_participant =
                    step_index(self.selected_participant, delta, self.participant_count());
            }
            Step::Upload | Step::Result => {}
        }
    }

    /// Move the payer column on the Split step by `delta`
    pub fn move_column(&mut self, delta: isize) {
        self.selected_participant =
            step_index(self.selected_participant, delta, self.participant_count());
    }

    /// Keep selections inside their lists after removals
    pub fn clamp_selection(&mut self) {
        self.selected_item = self.selected_item.min(self.items().len().saturating_sub(1));
        self.selected_participant = self
            .selected_participant
            .min(self.participant_count().saturating_sub(1));
    }

    // --- Upload -----------------------------------------------------------

    /// Queue the typed receipt path for extraction
    pub fn request_extraction(&mut self) {
        let path = self.image_input.value().trim().to_string();
        if path.is_empty() {
            if self.controller.state().bill().is_some() {
                self.go_next();
            } else {
                self.notify(Notification::warning("Enter the path of a receipt photo"));
            }
            return;
        }
        self.pending_extraction = Some(PathBuf::from(path));
        self.busy = true;
    }

    /// Read the receipt at `path` and submit it to the wizard
    pub async fn run_extraction(&mut self, path: PathBuf) {
        let result = match ReceiptImage::from_path(&path) {
            Ok(image) => self.controller.submit_receipt(&image).await,
            Err(err) => Err(err.into()),
        };
        self.busy = false;

        match result {
            Ok(_) => {
                self.selected_item = 0;
                self.image_input.clear();
                let Some(bill) = self.controller.state().bill() else {
                    return;
                };
                let summary = format!(
                    "Read {} item(s) from {}",
                    bill.items().len(),
                    if bill.merchant_name().is_empty() {
                        "the receipt"
                    } else {
                        bill.merchant_name()
                    }
                );
                let note = bill.reported_total_mismatch().and(bill.reported_total()).map(|reported| {
                    format!(
                        "The receipt says {}; check the items",
                        reported.format_with_symbol(self.currency())
                    )
                });
                self.notify(Notification::success(summary));
                if let Some(note) = note {
                    self.notify(Notification::warning(note));
                }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "receipt not extracted");
                self.notify_error(&err);
                if matches!(&err, PatunganError::Extraction(e) if e.is_transient()) {
                    self.notify(
                        Notification::info("Press Enter to try the same receipt again")
                            .with_lifetime(Duration::from_secs(6)),
                    );
                }
            }
        }
    }

    // --- Navigation -------------------------------------------------------

    pub fn go_next(&mut self) {
        match self.controller.next() {
            Ok(Step::Result) => {
                let warnings: Vec<String> = self
                    .controller
                    .state()
                    .outcome()
                    .warnings
                    .iter()
                    .map(|w| {
                        format!(
                            "Item '{}' has not been assigned to anyone ({})",
                            w.item_name,
                            w.amount.format_with_symbol(self.currency())
                        )
                    })
                    .collect();
                for warning in warnings {
                    self.notify(Notification::warning(warning));
                }
            }
            Ok(Step::Split) => {
                self.selected_item = 0;
                self.selected_participant = 0;
            }
            Ok(_) => {}
            Err(err) => self.notify_error(&err),
        }
        self.clamp_selection();
    }

    pub fn go_back(&mut self) {
        if let Err(err) = self.controller.back() {
            self.notify_error(&err);
        }
        self.clamp_selection();
    }

    /// Start a new session with an empty form
    pub fn reset_session(&mut self) {
        self.controller.reset();
        self.image_input = receipt_input();
        self.selected_item = 0;
        self.selected_participant = 0;
        self.notifications.clear();
        info!("session restarted from the TUI");
    }

    // --- Dialogs ----------------------------------------------------------

    /// Open the item form for a new item, or for the selected one
    pub fn open_item_form(&mut self, edit_selected: bool) {
        let form = if edit_selected {
            match self.selected_line_item() {
                Some(item) => ItemFormState::for_item(item),
                None => return,
            }
        } else {
            ItemFormState::new()
        };
        self.item_form = form;
        self.open_dialog(ActiveDialog::ItemForm);
    }

    pub fn open_prompt(&mut self, purpose: PromptPurpose) {
        let state = self.controller.state();
        let initial = match purpose {
            PromptPurpose::MerchantName => {
                state.bill().map(|b| b.merchant_name().to_string())
            }
            PromptPurpose::TaxAmount => state.bill().map(|b| b.tax_amount().to_string()),
            PromptPurpose::ServiceCharge => {
                state.bill().map(|b| b.service_charge().to_string())
            }
            PromptPurpose::RenameParticipant(index) => state
                .participants()
                .get(index)
                .map(|p| p.name().to_string()),
            PromptPurpose::AddParticipant => None,
        };
        self.prompt = PromptState::new(purpose).with_value(initial.unwrap_or_default());
        self.open_dialog(ActiveDialog::Prompt);
    }

    /// Ask for confirmation before removing the highlighted item or participant
    pub fn confirm_remove(&mut self) {
        let action = match self.step() {
            Step::Edit => self.selected_line_item().map(|item| ConfirmAction::RemoveItem {
                id: item.id(),
                name: item.name().to_string(),
            }),
            Step::Friends => self
                .controller
                .state()
                .participants()
                .get(self.selected_participant)
                .map(|p| ConfirmAction::RemoveParticipant {
                    index: self.selected_participant,
                    name: p.name().to_string(),
                }),
            _ => None,
        };
        if let Some(action) = action {
            self.open_dialog(ActiveDialog::Confirm(action));
        }
    }

    /// Run a confirmed action
    pub fn run_confirmed(&mut self, action: ConfirmAction) {
        let (result, name) = match action {
            ConfirmAction::Reset => {
                self.reset_session();
                return;
            }
            ConfirmAction::RemoveItem { id, name } => {
                (self.controller.remove_item(id).map(drop), name)
            }
            ConfirmAction::RemoveParticipant { index, name } => {
                (self.controller.remove_participant(index).map(drop), name)
            }
        };
        match result {
            Ok(()) => self.notify(Notification::success(format!("Removed {}", name))),
            Err(err) => self.notify_error(&err),
        }
        self.clamp_selection();
    }

    // --- Split ------------------------------------------------------------

    /// Toggle the highlighted participant as payer of the highlighted item
    pub fn toggle_selected_payer(&mut self) {
        let Some(item) = self.selected_line_item().map(LineItem::id) else {
            return;
        };
        let Some(name) = self
            .controller
            .state()
            .participants()
            .get(self.selected_participant)
            .map(|p| p.name().to_string())
        else {
            return;
        };
        if let Err(err) = self.controller.toggle_payer(item, &name) {
            self.notify_error(&err);
        }
    }

    /// Make every participant a payer of the highlighted item
    pub fn assign_everyone_to_selected(&mut self) {
        let Some(item) = self.selected_line_item().map(LineItem::id) else {
            return;
        };
        let names: Vec<String> = self
            .controller
            .state()
            .participants()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        if let Err(err) = self.controller.set_payers(item, &names) {
            self.notify_error(&err);
        }
    }
}

fn receipt_input() -> TextInput {
    TextInput::new()
        .label("Receipt")
        .placeholder("path/to/receipt.jpg")
        .focused(true)
}

/// Move `index` by `delta` inside `0..len`, wrapping at both ends
fn step_index(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}
