//! Edit step view
//!
//! Shows the extracted bill as a table of line items with the totals
//! underneath.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::bill::format_quantity;
use crate::models::BillRecord;
use crate::tui::app::App;
use crate::wizard::Step;

use super::{step_block, truncate_string};

/// Render the bill editor
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = step_block(Step::Edit, "Check the bill");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(bill) = app.controller.state().bill() else {
        frame.render_widget(
            Paragraph::new("No receipt yet. Press 'b' to go back and upload one.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Merchant and date
            Constraint::Min(3),    // Items
            Constraint::Length(5), // Totals
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(header_lines(bill)), chunks[0]);
    render_items(frame, bill, app.selected_item, chunks[1]);
    frame.render_widget(Paragraph::new(total_lines(bill, app.currency())), chunks[2]);
}

fn header_lines(bill: &BillRecord) -> Vec<Line<'static>> {
    let merchant = if bill.merchant_name().is_empty() {
        Span::styled("(no merchant, press m)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            bill.merchant_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let mut lines = vec![Line::from(vec![Span::raw(" Merchant: "), merchant])];
    if let Some(date) = bill.date() {
        let when = match bill.time() {
            Some(time) => format!("{} {}", date, time.format("%H:%M")),
            None => date.to_string(),
        };
        lines.push(Line::from(format!(" Date:     {}", when)));
    }
    lines
}

fn render_items(frame: &mut Frame, bill: &BillRecord, selected: usize, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));

    if bill.items().is_empty() {
        let text = Paragraph::new("No items. Press 'a' to add one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(3),  // #
        Constraint::Min(20),    // Item
        Constraint::Length(6),  // Qty
        Constraint::Length(14), // Unit price
        Constraint::Length(14), // Total
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("#").style(bold),
        Cell::from("Item").style(bold),
        Cell::from("Qty").style(bold),
        Cell::from("Unit price").style(bold),
        Cell::from("Total").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = bill
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            // Totals typed over the computed one stand out
            let total_style = if item.total_matches_unit_price() {
                Style::default()
            } else {
                Style::default().fg(Color::Magenta)
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(truncate_string(item.name(), 40)),
                Cell::from(format_quantity(item.quantity())),
                Cell::from(item.unit_price().to_string()),
                Cell::from(item.total_price().to_string()).style(total_style),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn total_lines(bill: &BillRecord, currency: &str) -> Vec<Line<'static>> {
    let line = |label: &str, amount: String, style: Style| {
        Line::from(vec![
            Span::styled(format!(" {:<16}", label), Style::default().fg(Color::White)),
            Span::styled(format!("{:>18}", amount), style),
        ])
    };

    let mut lines = vec![
        line("Subtotal", bill.items_total().format_with_symbol(currency), Style::default()),
        line("Tax (t)", bill.tax_amount().format_with_symbol(currency), Style::default()),
        line(
            "Service (s)",
            bill.service_charge().format_with_symbol(currency),
            Style::default(),
        ),
        line(
            "Total",
            bill.total_amount().format_with_symbol(currency),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ];

    if let (Some(reported), Some(_)) = (bill.reported_total(), bill.reported_total_mismatch()) {
        lines.push(Line::from(Span::styled(
            format!(" The receipt says {}", reported.format_with_symbol(currency)),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}
