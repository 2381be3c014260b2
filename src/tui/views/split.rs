//! Split step view
//!
//! Method choice on top. For a per-item split, a grid of items against
//! participants shows who pays for what.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{BillRecord, ItemAssignment, Participant, SplitMethod};
use crate::tui::app::App;
use crate::tui::layout::StepLayout;
use crate::wizard::Step;

use super::{step_block, truncate_string};

/// Render the split method choice and payer grid
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = step_block(Step::Split, "How should we split?");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = StepLayout::new(inner, 3);

    let state = app.controller.state();
    frame.render_widget(Paragraph::new(method_lines(state.split_method())), layout.summary);

    let Some(bill) = state.bill() else {
        return;
    };
    match state.split_method() {
        None => {}
        Some(SplitMethod::Even) => {
            let count = state.participants().len();
            let each = bill
                .total_amount()
                .share(count)
                .map(|m| m.format_with_symbol(app.currency()))
                .unwrap_or_else(|| "-".to_string());
            let text = Line::from(vec![
                Span::raw(format!(
                    " {} split between {} people: ",
                    bill.total_amount().format_with_symbol(app.currency()),
                    count
                )),
                Span::styled(
                    format!("{} each", each),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(text), layout.body);
        }
        Some(SplitMethod::PerItem) => render_grid(
            frame,
            bill,
            state.participants(),
            state.assignment(),
            (app.selected_item, app.selected_participant),
            layout.body,
        ),
    }
}

fn method_lines(method: Option<SplitMethod>) -> Vec<Line<'static>> {
    let option = |key: &'static str, m: SplitMethod, detail: &'static str| {
        let chosen = method == Some(m);
        let style = if chosen {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!(" {} ", if chosen { "(•)" } else { "( )" }), style),
            Span::styled(format!("{:<12}", m.to_string()), style),
            Span::styled(format!("[{}] ", key), Style::default().fg(Color::Cyan)),
            Span::styled(detail, Style::default().fg(Color::DarkGray)),
        ])
    };
    vec![
        option("e", SplitMethod::Even, "everyone pays the same share of the total"),
        option("p", SplitMethod::PerItem, "each item is shared by whoever had it"),
    ]
}

fn render_grid(
    frame: &mut Frame,
    bill: &BillRecord,
    participants: &[Participant],
    assignment: &ItemAssignment,
    (row, column): (usize, usize),
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" Space: toggle  A: everyone ")
        .border_style(Style::default().fg(Color::DarkGray));

    if bill.items().is_empty() || participants.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing to assign.")
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let mut widths = vec![Constraint::Min(18), Constraint::Length(14)];
    widths.extend(participants.iter().map(|_| Constraint::Length(10)));

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut header = vec![Cell::from("Item").style(bold), Cell::from("Total").style(bold)];
    header.extend(participants.iter().enumerate().map(|(i, p)| {
        let style = if i == column {
            bold.fg(Color::Cyan)
        } else {
            bold
        };
        Cell::from(truncate_string(p.name(), 9)).style(style)
    }));

    let rows: Vec<Row> = bill
        .items()
        .iter()
        .enumerate()
        .map(|(r, item)| {
            let has_payer = participants
                .iter()
                .any(|p| assignment.is_assigned(item.id(), p.name()));
            let name_style = if has_payer {
                Style::default()
            } else {
                Style::default().fg(Color::Yellow)
            };
            let marker = if has_payer { "" } else { "! " };

            let mut cells = vec![
                Cell::from(format!("{}{}", marker, truncate_string(item.name(), 30)))
                    .style(name_style),
                Cell::from(item.total_price().to_string()),
            ];
            cells.extend(participants.iter().enumerate().map(|(c, p)| {
                let mark = if assignment.is_assigned(item.id(), p.name()) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let style = if r == row && c == column {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                Cell::from(mark).style(style)
            }));
            Row::new(cells)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Yellow)))
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(row));
    frame.render_stateful_widget(table, area, &mut state);
}
