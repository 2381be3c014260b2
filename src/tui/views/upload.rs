//! Upload step view

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;
use crate::wizard::Step;

use super::step_block;

/// Render the receipt picker
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = step_block(Step::Upload, "Upload a receipt");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Instructions
            Constraint::Length(1), // Path input
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Current bill
        ])
        .margin(1)
        .split(inner);

    let instructions = vec![
        Line::from("Type the path of a photo of your receipt (PNG or JPEG) and press Enter."),
        Line::from(Span::styled(
            "The items, tax and service charge are read from the photo; you can fix them next.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(instructions), chunks[0]);

    frame.render_widget(&app.image_input, chunks[1]);

    if let Some(bill) = app.controller.state().bill() {
        let merchant = if bill.merchant_name().is_empty() {
            "the last receipt"
        } else {
            bill.merchant_name()
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Current bill: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!(
                    "{} ({} items, {})",
                    merchant,
                    bill.items().len(),
                    bill.total_amount().format_with_symbol(app.currency())
                )),
            ]),
            Line::from(Span::styled(
                "Press Enter with an empty path to keep it, or read a new receipt to replace it.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), chunks[3]);
    }
}
