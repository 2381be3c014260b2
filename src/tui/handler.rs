//! Event handler for the TUI
//!
//! Routes keyboard events to the open dialog, the global keys or the keys of
//! the current wizard step.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::SplitMethod;
use crate::wizard::Step;

use super::app::{ActiveDialog, App, ConfirmAction};
use super::dialogs;
use super::dialogs::prompt::PromptPurpose;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => {
            app.notifications.remove_expired();
            Ok(())
        }
        Event::Resize(_, _) => Ok(()),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.busy {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return Ok(());
    }

    if key.code == KeyCode::F(1) {
        app.open_dialog(ActiveDialog::Help);
        return Ok(());
    }

    // The Upload step is a text field, so letters are typed, not commands
    if app.step() == Step::Upload {
        handle_upload_key(app, key);
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return Ok(());
        }
        KeyCode::Char('?') => {
            app.open_dialog(ActiveDialog::Help);
            return Ok(());
        }
        KeyCode::Char('x') => {
            app.notifications.dismiss();
            return Ok(());
        }
        _ => {}
    }

    match app.step() {
        Step::Upload => {}
        Step::Edit => handle_edit_key(app, key),
        Step::Friends => handle_friends_key(app, key),
        Step::Split => handle_split_key(app, key),
        Step::Result => handle_result_key(app, key),
    }
    Ok(())
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::ItemForm => {
            dialogs::item::handle_key(app, key);
        }
        ActiveDialog::Prompt => {
            dialogs::prompt::handle_key(app, key);
        }
        ActiveDialog::Confirm(_) => {
            dialogs::confirm::handle_key(app, key);
        }
        ActiveDialog::None => {}
    }
}

fn handle_upload_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.request_extraction(),
        KeyCode::Esc => app.image_input.clear(),
        _ => {
            app.image_input.handle_key(key);
        }
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('a') => app.open_item_form(false),
        KeyCode::Char('e') | KeyCode::Enter => app.open_item_form(true),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_remove(),
        KeyCode::Char('m') => app.open_prompt(PromptPurpose::MerchantName),
        KeyCode::Char('t') => app.open_prompt(PromptPurpose::TaxAmount),
        KeyCode::Char('s') => app.open_prompt(PromptPurpose::ServiceCharge),
        KeyCode::Char('n') | KeyCode::Tab => app.go_next(),
        KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Esc => app.go_back(),
        _ => {}
    }
}

fn handle_friends_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('a') => app.open_prompt(PromptPurpose::AddParticipant),
        KeyCode::Char('r') | KeyCode::Char('e') | KeyCode::Enter => {
            if app.selected_participant < app.participant_count() {
                app.open_prompt(PromptPurpose::RenameParticipant(app.selected_participant));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_remove(),
        KeyCode::Char('n') | KeyCode::Tab => app.go_next(),
        KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Esc => app.go_back(),
        _ => {}
    }
}

fn choose_method(app: &mut App, method: SplitMethod) {
    if let Err(e) = app.controller.choose_split_method(method) {
        app.notify_error(&e);
    }
}

fn handle_split_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') | KeyCode::Char('1') => choose_method(app, SplitMethod::Even),
        KeyCode::Char('p') | KeyCode::Char('2') => choose_method(app, SplitMethod::PerItem),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_column(1),
        KeyCode::Char('h') | KeyCode::Left => app.move_column(-1),
        KeyCode::Char(' ') if per_item(app) => app.toggle_selected_payer(),
        KeyCode::Char('A') if per_item(app) => app.assign_everyone_to_selected(),
        KeyCode::Char('n') | KeyCode::Tab | KeyCode::Enter => app.go_next(),
        KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Esc => app.go_back(),
        _ => {}
    }
}

fn per_item(app: &App) -> bool {
    app.controller.state().split_method() == Some(SplitMethod::PerItem)
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Esc => app.go_back(),
        KeyCode::Char('r') => app.open_dialog(ActiveDialog::Confirm(ConfirmAction::Reset)),
        _ => {}
    }
}
