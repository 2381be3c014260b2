//! TUI Views module
//!
//! One view per wizard step, plus the progress header and status bar.

pub mod edit;
pub mod friends;
pub mod progress;
pub mod result;
pub mod split;
pub mod status_bar;
pub mod upload;

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::wizard::Step;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::{centered_rect_fixed, AppLayout};
use super::widgets::NotificationWidget;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    progress::render(frame, app, layout.header);

    match app.step() {
        Step::Upload => upload::render(frame, app, layout.main),
        Step::Edit => edit::render(frame, app, layout.main),
        Step::Friends => friends::render(frame, app, layout.main),
        Step::Split => split::render(frame, app, layout.main),
        Step::Result => result::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }

    if let Some(notification) = app.notifications.current() {
        frame.render_widget(
            NotificationWidget::new(notification),
            NotificationWidget::area(frame.area()),
        );
    }

    if app.busy {
        render_busy(frame);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match &app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::ItemForm => dialogs::item::render(frame, app),
        ActiveDialog::Prompt => dialogs::prompt::render(frame, app),
        ActiveDialog::Confirm(action) => dialogs::confirm::render(frame, action),
        ActiveDialog::None => {}
    }
}

fn render_busy(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let text = Paragraph::new("\nReading the receipt, please wait...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(block);
    frame.render_widget(text, area);
}

/// Block around a step view
pub(crate) fn step_block(step: Step, title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {}. {} ", step.number(), title))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Truncate a string to at most `max_len` characters
pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
