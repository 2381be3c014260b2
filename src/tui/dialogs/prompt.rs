//! Single-field prompt dialog
//!
//! Used for the merchant name, tax, service charge and participant names.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::Money;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::{Notification, TextInput};

use super::{form_hints, render_text_field};

/// What the typed value is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    MerchantName,
    TaxAmount,
    ServiceCharge,
    AddParticipant,
    RenameParticipant(usize),
}

impl PromptPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            Self::MerchantName => " Merchant ",
            Self::TaxAmount => " Tax ",
            Self::ServiceCharge => " Service Charge ",
            Self::AddParticipant => " Add Friend ",
            Self::RenameParticipant(_) => " Rename Friend ",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MerchantName => "Merchant",
            Self::TaxAmount | Self::ServiceCharge => "Amount",
            Self::AddParticipant | Self::RenameParticipant(_) => "Name",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::MerchantName => "Shop or restaurant",
            Self::TaxAmount | Self::ServiceCharge => "0",
            Self::AddParticipant | Self::RenameParticipant(_) => "e.g. Budi",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptState {
    pub purpose: PromptPurpose,
    pub input: TextInput,
    pub error_message: Option<String>,
}

impl PromptState {
    pub fn new(purpose: PromptPurpose) -> Self {
        Self {
            purpose,
            input: TextInput::new()
                .label(purpose.label())
                .placeholder(purpose.placeholder()),
            error_message: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.input.set_value(value);
        self
    }

    fn amount(&self) -> Result<Money, String> {
        let text = self.input.value().trim();
        if text.is_empty() {
            return Ok(Money::zero());
        }
        Money::parse(text).map_err(|_| format!("'{}' is not an amount", text))
    }
}

/// Render the prompt dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let prompt = &app.prompt;
    let area = centered_rect_fixed(52, 7, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(prompt.purpose.title())
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Field
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    render_text_field(frame, chunks[0], &prompt.input, true);
    if let Some(ref error) = prompt.error_message {
        let line = Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }
    frame.render_widget(Paragraph::new(form_hints(&[])), chunks[3]);
}

/// Handle key input for the prompt dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => match submit(app) {
            Ok(message) => {
                app.close_dialog();
                app.notify(Notification::success(message));
            }
            Err(e) => app.prompt.error_message = Some(e),
        },
        _ => {
            if !app.prompt.input.handle_key(key) {
                return false;
            }
            app.prompt.error_message = None;
        }
    }
    true
}

/// Apply the typed value; returns the confirmation to show
fn submit(app: &mut App) -> Result<String, String> {
    let value = app.prompt.input.value().trim().to_string();
    let controller = &mut app.controller;

    let message = match app.prompt.purpose {
        PromptPurpose::MerchantName => {
            controller
                .set_merchant_name(&value)
                .map_err(|e| e.to_string())?;
            "Merchant updated".to_string()
        }
        PromptPurpose::TaxAmount => {
            let amount = app.prompt.amount()?;
            controller.set_tax_amount(amount).map_err(|e| e.to_string())?;
            "Tax updated".to_string()
        }
        PromptPurpose::ServiceCharge => {
            let amount = app.prompt.amount()?;
            controller
                .set_service_charge(amount)
                .map_err(|e| e.to_string())?;
            "Service charge updated".to_string()
        }
        PromptPurpose::AddParticipant => {
            controller.add_participant(&value).map_err(|e| e.to_string())?;
            app.selected_participant = app.participant_count().saturating_sub(1);
            format!("Added {}", value)
        }
        PromptPurpose::RenameParticipant(index) => {
            controller
                .rename_participant(index, &value)
                .map_err(|e| e.to_string())?;
            format!("Renamed to {}", value)
        }
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_amount_is_zero() {
        let prompt = PromptState::new(PromptPurpose::TaxAmount);
        assert_eq!(prompt.amount().unwrap(), Money::zero());

        let prompt = prompt.with_value("Rp 1,500");
        assert!(prompt.amount().unwrap().approx_eq(Money::new(1500.0)));

        let prompt = PromptState::new(PromptPurpose::ServiceCharge).with_value("ten");
        assert_eq!(prompt.amount().unwrap_err(), "'ten' is not an amount");
    }

    #[test]
    fn test_labels_follow_purpose() {
        let prompt = PromptState::new(PromptPurpose::RenameParticipant(2));
        assert_eq!(prompt.input.label, "Name");
        assert_eq!(prompt.purpose.title(), " Rename Friend ");
    }
}
